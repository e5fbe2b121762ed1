//! Independent runs over the same input, one per configuration.

use rayon::prelude::*;
use tracing::debug;

use super::engine::{self, RunError};
use super::types::{IntervalRecord, IntervalResult, SimConfig};
use super::validate::DataPolicy;

/// Runs one checked engine per configuration over the same records.
///
/// Every run screens `records` under `policy` exactly as
/// [`engine::run_checked`] does, so rejected input fails each run rather
/// than producing NaN totals. Runs share no mutable state and execute on
/// the rayon pool. Results are returned in the order of `configs`.
pub fn sweep(
    records: &[IntervalRecord],
    configs: &[SimConfig],
    policy: DataPolicy,
) -> Vec<Result<Vec<IntervalResult>, RunError>> {
    debug!(runs = configs.len(), intervals = records.len(), ?policy, "starting sweep");
    configs
        .par_iter()
        .map(|config| engine::run_checked(records, config.clone(), policy))
        .collect()
}

/// Copies of `base` with the battery capacity replaced by each entry of `capacities_kwh`.
pub fn battery_capacity_variants(base: &SimConfig, capacities_kwh: &[f64]) -> Vec<SimConfig> {
    capacities_kwh
        .iter()
        .map(|&battery_capacity_kwh| SimConfig {
            battery_capacity_kwh,
            ..base.clone()
        })
        .collect()
}
