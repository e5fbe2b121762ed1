//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::types::{IntervalRecord, SimConfig};
use crate::sim::validate::DataPolicy;

/// Sampling cadence assumed when neither the scenario nor the input says otherwise.
pub const DEFAULT_INTERVAL_MINUTES: f64 = 5.0;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// PV array and battery parameters.
    #[serde(default)]
    pub system: SystemConfig,
    /// Timing and input-handling parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Synthetic input profile used when no CSV input is given.
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// PV array and battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Rated PV capacity (kWp).
    pub panel_capacity_kw: f64,
    /// Fractional PV power change per °C above 25 °C.
    pub temp_coefficient: f64,
    /// Usable battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Charge efficiency (0.0 to 1.0).
    pub charge_efficiency: f64,
    /// Initial state of charge (0.0 to 1.0).
    pub initial_soc: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            panel_capacity_kw: 5.0,
            temp_coefficient: -0.004,
            battery_capacity_kwh: 10.0,
            charge_efficiency: 0.95,
            initial_soc: 0.5,
        }
    }
}

/// Timing and input-handling parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Interval length in minutes. Inferred from the input timestamps when unset.
    pub interval_minutes: Option<f64>,
    /// How invalid input intervals are handled: `"reject"` or `"flag"`.
    pub data_policy: DataPolicy,
}

/// Synthetic input profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// First simulated day.
    pub start_date: NaiveDate,
    /// Number of days to generate.
    pub days: usize,
    /// Random seed for cloud and load noise.
    pub seed: u64,
    /// Clear-sky irradiance at solar noon (W/m²).
    pub peak_irradiance: f64,
    /// Standard deviation of the per-interval cloud multiplier.
    pub cloud_noise_std: f64,
    /// Hour at which daylight begins.
    pub sunrise_hr: f64,
    /// Hour at which daylight ends.
    pub sunset_hr: f64,
    /// Daily mean ambient temperature (°C).
    pub temp_mean_c: f64,
    /// Half the daily temperature swing (°C).
    pub temp_amp_c: f64,
    /// Baseline household load (kW).
    pub load_base_kw: f64,
    /// Sinusoidal load amplitude (kW).
    pub load_amp_kw: f64,
    /// Hour of the daily load peak.
    pub load_peak_hr: f64,
    /// Gaussian load noise standard deviation (kW).
    pub load_noise_std: f64,
    /// Energy price outside the peak window (per kWh).
    pub price_offpeak: f64,
    /// Energy price inside the peak window (per kWh).
    pub price_peak: f64,
    /// Start of the peak price window (hour, inclusive).
    pub peak_start_hr: f64,
    /// End of the peak price window (hour, exclusive).
    pub peak_end_hr: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 3,
            seed: 42,
            peak_irradiance: 900.0,
            cloud_noise_std: 0.1,
            sunrise_hr: 6.0,
            sunset_hr: 18.0,
            temp_mean_c: 28.0,
            temp_amp_c: 4.0,
            load_base_kw: 0.8,
            load_amp_kw: 0.6,
            load_peak_hr: 19.0,
            load_noise_std: 0.1,
            price_offpeak: 1035.0,
            price_peak: 1444.7,
            peak_start_hr: 17.0,
            peak_end_hr: 22.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.battery_capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Creates a new error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: 5 kWp array, 10 kWh battery, 5-minute data.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the cloudy preset: dim, noisy days and a cooler climate.
    pub fn cloudy() -> Self {
        Self {
            profile: ProfileConfig {
                peak_irradiance: 450.0,
                cloud_noise_std: 0.35,
                temp_mean_c: 22.0,
                temp_amp_c: 2.0,
                ..ProfileConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the large-battery preset: bigger array and storage, full at start.
    pub fn large_battery() -> Self {
        Self {
            system: SystemConfig {
                panel_capacity_kw: 8.0,
                battery_capacity_kwh: 20.0,
                initial_soc: 1.0,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "cloudy", "large_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "cloudy" => Ok(Self::cloudy()),
            "large_battery" => Ok(Self::large_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Interval length in hours for a run over `records`.
    ///
    /// An explicit `simulation.interval_minutes` wins; otherwise the spacing
    /// of the first two records is used, falling back to
    /// [`DEFAULT_INTERVAL_MINUTES`].
    pub fn interval_hours(&self, records: &[IntervalRecord]) -> f64 {
        if let Some(minutes) = self.simulation.interval_minutes {
            return minutes / 60.0;
        }
        if let [first, second, ..] = records {
            let secs = (second.timestamp - first.timestamp).num_seconds();
            if secs > 0 {
                return secs as f64 / 3600.0;
            }
        }
        DEFAULT_INTERVAL_MINUTES / 60.0
    }

    /// Builds the engine configuration for the given interval length.
    pub fn sim_config(&self, interval_hours: f64) -> SimConfig {
        let s = &self.system;
        SimConfig::new(
            s.panel_capacity_kw,
            s.temp_coefficient,
            s.battery_capacity_kwh,
            s.charge_efficiency,
            s.initial_soc,
            interval_hours,
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let interval_hours = self
            .simulation
            .interval_minutes
            .unwrap_or(DEFAULT_INTERVAL_MINUTES)
            / 60.0;

        let mut errors: Vec<ConfigError> = self
            .sim_config(interval_hours)
            .validate()
            .into_iter()
            .map(|e| {
                let section = if e.field == "interval_hours" {
                    "simulation.interval_minutes".to_string()
                } else {
                    format!("system.{}", e.field)
                };
                ConfigError { field: section, ..e }
            })
            .collect();

        let p = &self.profile;
        if p.days == 0 {
            errors.push(ConfigError::new("profile.days", "must be > 0"));
        }
        if !(0.0..=24.0).contains(&p.sunrise_hr)
            || !(0.0..=24.0).contains(&p.sunset_hr)
            || p.sunrise_hr >= p.sunset_hr
        {
            errors.push(ConfigError::new(
                "profile.sunrise_hr",
                "must satisfy 0 <= sunrise_hr < sunset_hr <= 24",
            ));
        }
        if !(0.0..=24.0).contains(&p.peak_start_hr)
            || !(0.0..=24.0).contains(&p.peak_end_hr)
            || p.peak_start_hr > p.peak_end_hr
        {
            errors.push(ConfigError::new(
                "profile.peak_start_hr",
                "must satisfy 0 <= peak_start_hr <= peak_end_hr <= 24",
            ));
        }
        let non_negative = [
            ("profile.peak_irradiance", p.peak_irradiance),
            ("profile.cloud_noise_std", p.cloud_noise_std),
            ("profile.load_base_kw", p.load_base_kw),
            ("profile.load_noise_std", p.load_noise_std),
            ("profile.price_offpeak", p.price_offpeak),
            ("profile.price_peak", p.price_peak),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};

    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[system]
panel_capacity_kw = 6.5
temp_coefficient = -0.0035
battery_capacity_kwh = 13.5
charge_efficiency = 0.9
initial_soc = 0.2

[simulation]
interval_minutes = 15
data_policy = "flag"

[profile]
start_date = "2024-07-01"
days = 2
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.system.battery_capacity_kwh), Some(13.5));
        assert_eq!(cfg.as_ref().and_then(|c| c.simulation.interval_minutes), Some(15.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.simulation.data_policy),
            Some(DataPolicy::Flag)
        );
        assert_eq!(cfg.as_ref().map(|c| c.profile.days), Some(2));
        // Unset profile fields keep their defaults.
        assert_eq!(cfg.as_ref().map(|c| c.profile.sunrise_hr), Some(6.0));
    }

    #[test]
    fn empty_toml_is_baseline() {
        let cfg = ScenarioConfig::from_toml_str("");
        assert!(cfg.is_ok());
        assert_eq!(
            cfg.ok().map(|c| c.system.panel_capacity_kw),
            Some(SystemConfig::default().panel_capacity_kw)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
panel_capacity_kw = 5.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_data_policy_rejected() {
        let toml = "[simulation]\ndata_policy = \"ignore\"\n";
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.battery_capacity_kwh = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.battery_capacity_kwh"));
    }

    #[test]
    fn validation_catches_invalid_soc() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.initial_soc = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.initial_soc"));
    }

    #[test]
    fn validation_catches_zero_interval() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.interval_minutes = Some(0.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.interval_minutes"));
    }

    #[test]
    fn validation_catches_inverted_daylight() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.profile.sunrise_hr = 19.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "profile.sunrise_hr"));
    }

    #[test]
    fn validation_collects_all_errors() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.charge_efficiency = 1.2;
        cfg.profile.days = 0;
        cfg.profile.price_peak = -1.0;
        assert_eq!(cfg.validate().len(), 3);
    }

    fn records(step_minutes: i64) -> Vec<IntervalRecord> {
        (0..3)
            .map(|i| IntervalRecord {
                timestamp: NaiveDateTime::default() + Duration::minutes(step_minutes * i),
                irradiance: 0.0,
                ambient_temp_c: 25.0,
                load_kw: 1.0,
                price_per_kwh: 1.0,
            })
            .collect()
    }

    #[test]
    fn interval_inferred_from_records() {
        let cfg = ScenarioConfig::baseline();
        assert!((cfg.interval_hours(&records(15)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn explicit_interval_wins() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.interval_minutes = Some(5.0);
        assert!((cfg.interval_hours(&records(15)) - 5.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn interval_falls_back_to_default() {
        let cfg = ScenarioConfig::baseline();
        assert!((cfg.interval_hours(&[]) - DEFAULT_INTERVAL_MINUTES / 60.0).abs() < 1e-12);
        assert!((cfg.interval_hours(&records(0)) - DEFAULT_INTERVAL_MINUTES / 60.0).abs() < 1e-12);
    }

    #[test]
    fn sim_config_copies_system() {
        let cfg = ScenarioConfig::large_battery();
        let sim = cfg.sim_config(0.25);
        assert_eq!(sim.battery_capacity_kwh, 20.0);
        assert_eq!(sim.initial_soc, 1.0);
        assert_eq!(sim.interval_hours, 0.25);
    }
}
