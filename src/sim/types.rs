//! Core simulation types: run configuration, interval inputs, and interval results.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ConfigError;
use crate::sim::validate::InputError;

/// Immutable configuration for one simulation run.
///
/// The engine reads every physical parameter from this struct; nothing is
/// taken from ambient or global state.
///
/// # Examples
///
/// ```
/// use solar_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(5.0, -0.004, 10.0, 0.95, 0.5, 5.0 / 60.0);
/// assert!(cfg.validate().is_empty());
/// assert_eq!(cfg.intervals_per_day(), 288);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Rated PV capacity (kWp, > 0).
    pub panel_capacity_kw: f64,
    /// Fractional PV power change per °C above 25 °C.
    pub temp_coefficient: f64,
    /// Usable battery capacity (kWh, > 0).
    pub battery_capacity_kwh: f64,
    /// Fraction of surplus retained when charging (0.0 to 1.0).
    pub charge_efficiency: f64,
    /// Initial state of charge as a fraction of capacity (0.0 to 1.0).
    pub initial_soc: f64,
    /// Duration of one interval in hours.
    pub interval_hours: f64,
}

/// Temperature excursion around 25 °C over which the derating factor must stay positive.
const TEMP_FACTOR_SPAN_C: f64 = 50.0;

impl SimConfig {
    /// Creates a new run configuration. Call [`SimConfig::validate`] before use.
    pub fn new(
        panel_capacity_kw: f64,
        temp_coefficient: f64,
        battery_capacity_kwh: f64,
        charge_efficiency: f64,
        initial_soc: f64,
        interval_hours: f64,
    ) -> Self {
        Self {
            panel_capacity_kw,
            temp_coefficient,
            battery_capacity_kwh,
            charge_efficiency,
            initial_soc,
            interval_hours,
        }
    }

    /// Number of intervals in 24 hours, rounded to the nearest whole interval.
    pub fn intervals_per_day(&self) -> usize {
        if self.interval_hours > 0.0 {
            (24.0 / self.interval_hours).round() as usize
        } else {
            0
        }
    }

    /// Checks every run precondition and returns all violations.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(self.panel_capacity_kw > 0.0 && self.panel_capacity_kw.is_finite()) {
            errors.push(ConfigError::new("panel_capacity_kw", "must be > 0"));
        }
        if !self.temp_coefficient.is_finite() {
            errors.push(ConfigError::new("temp_coefficient", "must be finite"));
        } else {
            let worst = 1.0 - self.temp_coefficient.abs() * TEMP_FACTOR_SPAN_C;
            if worst <= 0.0 {
                errors.push(ConfigError::new(
                    "temp_coefficient",
                    format!(
                        "|coefficient| must be < {:.3} so output stays positive within 25 ± {TEMP_FACTOR_SPAN_C} °C",
                        1.0 / TEMP_FACTOR_SPAN_C
                    ),
                ));
            }
        }
        if !(self.battery_capacity_kwh > 0.0 && self.battery_capacity_kwh.is_finite()) {
            errors.push(ConfigError::new("battery_capacity_kwh", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.charge_efficiency) {
            errors.push(ConfigError::new("charge_efficiency", "must be in [0.0, 1.0]"));
        }
        if !(0.0..=1.0).contains(&self.initial_soc) {
            errors.push(ConfigError::new("initial_soc", "must be in [0.0, 1.0]"));
        }
        if !(self.interval_hours > 0.0 && self.interval_hours.is_finite()) {
            errors.push(ConfigError::new("interval_hours", "must be > 0"));
        }

        errors
    }
}

/// Measured or generated conditions for one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord {
    /// Start of the interval.
    pub timestamp: NaiveDateTime,
    /// Plane-of-array irradiance (W/m², expected >= 0).
    pub irradiance: f64,
    /// Ambient temperature (°C).
    pub ambient_temp_c: f64,
    /// Average household load over the interval (kW, expected >= 0).
    pub load_kw: f64,
    /// Grid energy price for the interval (per kWh, expected >= 0).
    pub price_per_kwh: f64,
}

/// Engine output for one interval, paired 1:1 with its `IntervalRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalResult {
    /// Position in the input sequence.
    pub index: usize,
    /// Timestamp copied from the input record.
    pub timestamp: NaiveDateTime,
    /// PV output (kW, >= 0).
    pub solar_kw: f64,
    /// Household load copied from the input record (kW).
    pub load_kw: f64,
    /// Stored energy after this interval (kWh).
    pub battery_level_kwh: f64,
    /// Stored energy after this interval as a percentage of capacity.
    pub battery_pct: f64,
    /// Energy drawn from the grid (kWh, >= 0).
    pub grid_import_kwh: f64,
    /// `grid_import_kwh * price_per_kwh`.
    pub cost: f64,
    /// Surplus discarded because the battery was full (kWh).
    pub curtailed_kwh: f64,
    /// Data-quality issue that caused this interval to be skipped, if any.
    pub flag: Option<InputError>,
}

impl fmt::Display for IntervalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:>5} {} | solar={:>6.3} kW  load={:>6.3} kW | bat={:>7.3} kWh ({:>5.1}%) | \
             import={:>6.4} kWh  cost={:>10.2}",
            self.index,
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.solar_kw,
            self.load_kw,
            self.battery_level_kwh,
            self.battery_pct,
            self.grid_import_kwh,
            self.cost,
        )?;
        if let Some(flag) = &self.flag {
            write!(f, " | flagged: {flag}")?;
        }
        Ok(())
    }
}
