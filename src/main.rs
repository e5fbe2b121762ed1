//! solar-sim entry point: CLI wiring, input selection and reporting.

mod cli;

use std::process;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use solar_sim::config::{DEFAULT_INTERVAL_MINUTES, ScenarioConfig};
use solar_sim::io::export::export_csv;
use solar_sim::io::ingest::{SourceTable, read_input_from_path};
use solar_sim::profile;
use solar_sim::sim::report::SimReport;
use solar_sim::sim::sweep::{battery_capacity_variants, sweep};
use solar_sim::sim::types::{IntervalRecord, SimConfig};
use solar_sim::sim::{DataPolicy, IntervalResult, run_checked};
use solar_sim::telemetry::init_tracing;

use crate::cli::CliOptions;

/// Loads the scenario: `--scenario` takes priority, then `--preset`.
fn load_scenario(opts: &CliOptions) -> Result<ScenarioConfig> {
    let scenario = if let Some(ref path) = opts.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(ref name) = opts.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

/// Reads the measured series with its source table, or generates the
/// scenario's synthetic profile.
fn load_records(
    opts: &CliOptions,
    scenario: &ScenarioConfig,
) -> Result<(Vec<IntervalRecord>, Option<SourceTable>)> {
    if let Some(ref path) = opts.input {
        let input = read_input_from_path(path)
            .with_context(|| format!("failed to load input \"{}\"", path.display()))?;
        return Ok((input.records, Some(input.source)));
    }
    let minutes = scenario
        .simulation
        .interval_minutes
        .unwrap_or(DEFAULT_INTERVAL_MINUTES);
    let records = profile::generate(&scenario.profile, minutes);
    info!(
        days = scenario.profile.days,
        seed = scenario.profile.seed,
        rows = records.len(),
        "generated synthetic profile"
    );
    Ok((records, None))
}

/// Runs one engine per battery capacity and prints a comparison table.
fn run_sweep(
    records: &[IntervalRecord],
    config: &SimConfig,
    capacities: &[f64],
    policy: DataPolicy,
) -> Result<()> {
    let variants = battery_capacity_variants(config, capacities);
    let outcomes = sweep(records, &variants, policy);

    println!(
        "{:>12} {:>14} {:>14} {:>12} {:>10}",
        "battery_kwh", "import_kwh", "cost", "curtail_kwh", "self_suff"
    );
    for (variant, outcome) in variants.iter().zip(outcomes) {
        let results = outcome.with_context(|| {
            format!("battery capacity {} kWh", variant.battery_capacity_kwh)
        })?;
        let report = SimReport::from_results(&results, variant.interval_hours);
        println!(
            "{:>12.2} {:>14.3} {:>14.2} {:>12.3} {:>9.1}%",
            variant.battery_capacity_kwh,
            report.grid_import_kwh,
            report.cost,
            report.curtailed_kwh,
            report.self_sufficiency_pct,
        );
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(opts: &CliOptions, config: SimConfig, report: SimReport, results: Vec<IntervalResult>) -> Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(solar_sim::api::AppState {
        config,
        report,
        results,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(solar_sim::api::serve(state, addr))
        .with_context(|| format!("API server on {addr} failed"))
}

#[cfg(not(feature = "api"))]
fn serve(opts: &CliOptions, _config: SimConfig, _report: SimReport, _results: Vec<IntervalResult>) -> Result<()> {
    tracing::warn!(port = opts.port, "--serve requires building with `--features api`; skipping");
    Ok(())
}

fn run(opts: &CliOptions) -> Result<()> {
    let scenario = load_scenario(opts)?;
    let (records, source) = load_records(opts, &scenario)?;

    let interval_hours = scenario.interval_hours(&records);
    let config = scenario.sim_config(interval_hours);

    if let Some(ref capacities) = opts.sweep_capacities {
        return run_sweep(&records, &config, capacities, scenario.simulation.data_policy);
    }

    let results = run_checked(&records, config.clone(), scenario.simulation.data_policy)?;
    let report = SimReport::from_results(&results, interval_hours);
    info!(
        intervals = report.intervals,
        grid_import_kwh = report.grid_import_kwh,
        cost = report.cost,
        flagged = report.flagged_intervals,
        "simulation finished"
    );

    // Print per-interval results
    if !opts.quiet {
        for r in &results {
            println!("{r}");
        }
        println!();
    }

    // Print aggregate report
    println!("{report}");

    // Export CSV if requested
    if let Some(ref path) = opts.out {
        export_csv(&records, &results, source.as_ref(), path)
            .with_context(|| format!("failed to write CSV \"{}\"", path.display()))?;
        info!(path = %path.display(), "results written");
    }

    if opts.serve {
        serve(opts, config, report, results)?;
    }
    Ok(())
}

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
