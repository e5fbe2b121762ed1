use std::env;
use std::path::PathBuf;

/// Default API port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed command-line options.
#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub input: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub quiet: bool,
    pub sweep_capacities: Option<Vec<f64>>,
    pub serve: bool,
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut input = None;
    let mut out = None;
    let mut quiet = false;
    let mut sweep_capacities = None;
    let mut serve = false;
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--input" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --input (expected a CSV file path)")?;
                if input.replace(PathBuf::from(path)).is_some() {
                    return Err("--input provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--sweep-capacity" => {
                i += 1;
                let list = args.next_or_err(
                    i,
                    "missing value for --sweep-capacity (expected comma-separated kWh values)",
                )?;
                sweep_capacities = Some(parse_capacity_list(list)?);
            }
            "--quiet" | "-q" => quiet = true,
            "--serve" => serve = true,
            "--port" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = value
                    .parse()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("baseline".to_string());
    }

    Ok(CliOptions {
        scenario,
        preset,
        input,
        out,
        quiet,
        sweep_capacities,
        serve,
        port,
    })
}

fn parse_capacity_list(list: &str) -> Result<Vec<f64>, String> {
    let values = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("--sweep-capacity value \"{s}\" is not a number"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err("--sweep-capacity needs at least one value".to_string());
    }
    Ok(values)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("solar-sim: household PV + battery energy-balance simulator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  solar-sim [--scenario <toml> | --preset <name>] [--input <csv>] [--out <csv>] [--quiet]"
    );
    eprintln!("  solar-sim [...] --sweep-capacity <kWh,kWh,...>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>          Load scenario from TOML config file");
    eprintln!("  --preset <name>            Use a built-in preset (baseline, cloudy, large_battery)");
    eprintln!("  --input <path>             Simulate a measured CSV series instead of a synthetic profile");
    eprintln!("  --out <path>               Export per-interval results to CSV");
    eprintln!("  --quiet, -q                Print only the aggregate report");
    eprintln!("  --sweep-capacity <list>    Compare battery capacities over the same input");
    eprintln!("  --serve                    Start REST API server after simulation (feature `api`)");
    eprintln!("  --port <u16>               API server port (default: {DEFAULT_PORT})");
    eprintln!("  --help, -h                 Show this help message");
}
