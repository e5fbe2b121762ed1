//! Post-hoc aggregate report from simulation results.

use std::fmt;

use serde::Serialize;

use super::types::IntervalResult;

/// Aggregate metrics derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<IntervalResult>` to ensure consistency between
/// interval data and reported totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    /// Number of simulated intervals.
    pub intervals: usize,
    /// Simulated duration in days.
    pub days: f64,
    /// Total PV energy produced (kWh).
    pub solar_kwh: f64,
    /// Total household consumption (kWh).
    pub load_kwh: f64,
    /// Total energy bought from the grid (kWh).
    pub grid_import_kwh: f64,
    /// Total grid energy cost.
    pub cost: f64,
    /// Surplus discarded with a full battery (kWh).
    pub curtailed_kwh: f64,
    /// Share of load not served by the grid, in percent.
    pub self_sufficiency_pct: f64,
    /// Lowest battery level seen (percent of capacity).
    pub min_battery_pct: f64,
    /// Highest battery level seen (percent of capacity).
    pub max_battery_pct: f64,
    /// Battery level after the last interval (percent of capacity).
    pub final_battery_pct: f64,
    /// Number of intervals carrying a data-quality flag.
    pub flagged_intervals: usize,
}

impl SimReport {
    /// Computes all aggregates from the complete result vector.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation results
    /// * `interval_hours` - Interval duration in hours
    ///
    /// # Returns
    ///
    /// A `SimReport` with all fields populated; zeros for an empty run.
    pub fn from_results(results: &[IntervalResult], interval_hours: f64) -> Self {
        if results.is_empty() {
            return Self {
                intervals: 0,
                days: 0.0,
                solar_kwh: 0.0,
                load_kwh: 0.0,
                grid_import_kwh: 0.0,
                cost: 0.0,
                curtailed_kwh: 0.0,
                self_sufficiency_pct: 0.0,
                min_battery_pct: 0.0,
                max_battery_pct: 0.0,
                final_battery_pct: 0.0,
                flagged_intervals: 0,
            };
        }

        let mut solar_kwh = 0.0_f64;
        let mut load_kwh = 0.0_f64;
        let mut grid_import_kwh = 0.0_f64;
        let mut cost = 0.0_f64;
        let mut curtailed_kwh = 0.0_f64;
        let mut min_pct = f64::INFINITY;
        let mut max_pct = f64::NEG_INFINITY;
        let mut flagged = 0_usize;

        for r in results {
            if r.flag.as_ref().is_some_and(|f| f.is_value_error()) {
                // Skipped intervals carry no energy.
                flagged += 1;
            } else {
                if r.flag.is_some() {
                    flagged += 1;
                }
                load_kwh += r.load_kw * interval_hours;
            }
            solar_kwh += r.solar_kw * interval_hours;
            grid_import_kwh += r.grid_import_kwh;
            cost += r.cost;
            curtailed_kwh += r.curtailed_kwh;
            min_pct = min_pct.min(r.battery_pct);
            max_pct = max_pct.max(r.battery_pct);
        }

        let self_sufficiency_pct = if load_kwh > 0.0 {
            100.0 * (load_kwh - grid_import_kwh) / load_kwh
        } else {
            0.0
        };

        let final_battery_pct = results.last().map_or(0.0, |r| r.battery_pct);

        Self {
            intervals: results.len(),
            days: results.len() as f64 * interval_hours / 24.0,
            solar_kwh,
            load_kwh,
            grid_import_kwh,
            cost,
            curtailed_kwh,
            self_sufficiency_pct,
            min_battery_pct: min_pct,
            max_battery_pct: max_pct,
            final_battery_pct,
            flagged_intervals: flagged,
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Report ---")?;
        writeln!(
            f,
            "Intervals:             {} ({:.2} days)",
            self.intervals, self.days
        )?;
        writeln!(f, "Solar production:      {:.2} kWh", self.solar_kwh)?;
        writeln!(f, "Household load:        {:.2} kWh", self.load_kwh)?;
        writeln!(f, "Grid import:           {:.2} kWh", self.grid_import_kwh)?;
        writeln!(f, "Grid cost:             {:.2}", self.cost)?;
        writeln!(f, "Curtailed surplus:     {:.2} kWh", self.curtailed_kwh)?;
        writeln!(f, "Self-sufficiency:      {:.1}%", self.self_sufficiency_pct)?;
        writeln!(
            f,
            "Battery range:         {:.1}% to {:.1}% (final {:.1}%)",
            self.min_battery_pct, self.max_battery_pct, self.final_battery_pct
        )?;
        write!(f, "Flagged intervals:     {}", self.flagged_intervals)
    }
}
