//! Simulation engine: a sequential fold of interval records over battery state.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::ConfigError;
use crate::devices::{BatteryState, SolarArray};

use super::balance::{interval_cost, net_energy_kwh, settle};
use super::types::{IntervalRecord, IntervalResult, SimConfig};
use super::validate::{self, DataPolicy, InputError};

/// Reasons a checked run refuses to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("input rejected: {first} ({count} invalid interval(s) in total)")]
    Input { first: InputError, count: usize },
}

/// Energy-balance engine owning the battery for one run.
///
/// Each call to [`EnergyBalanceEngine::step`] consumes the next record and
/// mutates the battery exactly once. Results depend on all prior steps, so
/// intervals must be fed in order; a caller may stop between any two steps.
#[derive(Debug, Clone)]
pub struct EnergyBalanceEngine {
    config: SimConfig,
    solar: SolarArray,
    battery: BatteryState,
    next_index: usize,
}

impl EnergyBalanceEngine {
    /// Creates an engine with a fresh battery at the configured initial SoC.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` if the configuration is invalid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        if let Some(err) = config.validate().into_iter().next() {
            return Err(err);
        }
        let solar = SolarArray::new(config.panel_capacity_kw, config.temp_coefficient);
        let battery = BatteryState::new(config.battery_capacity_kwh, config.initial_soc);
        Ok(Self {
            config,
            solar,
            battery,
            next_index: 0,
        })
    }

    /// Advances the simulation by one interval.
    ///
    /// # Returns
    ///
    /// An `IntervalResult` with PV output, post-update battery level, grid
    /// import, and cost for this interval.
    pub fn step(&mut self, record: &IntervalRecord) -> IntervalResult {
        let index = self.next_index;
        self.next_index += 1;

        // 1. Generation
        let solar_kw = self.solar.power_kw(record.irradiance, record.ambient_temp_c);

        // 2. Balance through the battery
        let net_kwh = net_energy_kwh(solar_kw, record.load_kw, self.config.interval_hours);
        let settlement = settle(&mut self.battery, net_kwh, self.config.charge_efficiency);

        // 3. Cost
        let cost = interval_cost(settlement.grid_import_kwh, record.price_per_kwh);

        trace!(
            index,
            solar_kw,
            net_kwh,
            stored_kwh = self.battery.stored_kwh(),
            grid_import_kwh = settlement.grid_import_kwh,
            "interval settled"
        );

        IntervalResult {
            index,
            timestamp: record.timestamp,
            solar_kw,
            load_kw: record.load_kw,
            battery_level_kwh: self.battery.stored_kwh(),
            battery_pct: self.battery.percent(),
            grid_import_kwh: settlement.grid_import_kwh,
            cost,
            curtailed_kwh: settlement.curtailed_kwh,
            flag: None,
        }
    }

    /// Records a flagged interval without touching the battery.
    ///
    /// Used for intervals whose values are unusable; generation, import, and
    /// cost are reported as zero and the battery carries over unchanged.
    pub fn skip(&mut self, record: &IntervalRecord, issue: InputError) -> IntervalResult {
        let index = self.next_index;
        self.next_index += 1;
        debug!(index, %issue, "interval skipped");

        IntervalResult {
            index,
            timestamp: record.timestamp,
            solar_kw: 0.0,
            load_kw: record.load_kw,
            battery_level_kwh: self.battery.stored_kwh(),
            battery_pct: self.battery.percent(),
            grid_import_kwh: 0.0,
            cost: 0.0,
            curtailed_kwh: 0.0,
            flag: Some(issue),
        }
    }

    /// Steps through all records in order and returns one result per record.
    ///
    /// No validation is applied: NaN or negative inputs propagate into the
    /// results. Use [`run_checked`] to screen the input first.
    pub fn run(&mut self, records: &[IntervalRecord]) -> Vec<IntervalResult> {
        records.iter().map(|r| self.step(r)).collect()
    }

    /// Returns a reference to the battery.
    pub fn battery(&self) -> &BatteryState {
        &self.battery
    }

    /// Returns a reference to the run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Runs a fresh engine over `records`.
///
/// # Errors
///
/// Returns a `ConfigError` if `config` is invalid. Input values are not
/// screened.
pub fn run(records: &[IntervalRecord], config: SimConfig) -> Result<Vec<IntervalResult>, ConfigError> {
    let mut engine = EnergyBalanceEngine::new(config)?;
    Ok(engine.run(records))
}

/// Validates `records`, then runs a fresh engine according to `policy`.
///
/// Under [`DataPolicy::Reject`] any issue aborts before the first step.
/// Under [`DataPolicy::Flag`] intervals with unusable values are skipped and
/// flagged; intervals with only timestamp issues are simulated and flagged.
///
/// # Errors
///
/// Returns `RunError::Config` for an invalid configuration and
/// `RunError::Input` when rejecting bad input.
pub fn run_checked(
    records: &[IntervalRecord],
    config: SimConfig,
    policy: DataPolicy,
) -> Result<Vec<IntervalResult>, RunError> {
    let mut engine = EnergyBalanceEngine::new(config)?;
    let issues = validate::validate(records, engine.config().interval_hours);

    info!(
        intervals = records.len(),
        issues = issues.len(),
        ?policy,
        "starting simulation run"
    );

    if !issues.is_empty() {
        match policy {
            DataPolicy::Reject => {
                if let Some(first) = issues.first().cloned() {
                    let count = issues.len();
                    warn!(%first, count, "rejecting input");
                    return Err(RunError::Input { first, count });
                }
            }
            DataPolicy::Flag => {
                warn!(count = issues.len(), "flagging invalid intervals");
            }
        }
    }

    let mut pending = issues.into_iter().peekable();
    let mut results = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let issue = pending.next_if(|issue| issue.index() == index);
        let result = match issue {
            Some(issue) if issue.is_value_error() => engine.skip(record, issue),
            Some(issue) => IntervalResult {
                flag: Some(issue),
                ..engine.step(record)
            },
            None => engine.step(record),
        };
        results.push(result);
    }
    Ok(results)
}
