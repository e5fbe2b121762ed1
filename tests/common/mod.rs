//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};

use solar_sim::sim::types::{IntervalRecord, SimConfig};

/// Five-minute interval length in hours.
pub const FIVE_MINUTES_H: f64 = 5.0 / 60.0;

/// Reference system: 5 kWp, -0.4 %/°C, 10 kWh at 50 %, 95 % charge efficiency, 5-minute data.
pub fn baseline_config() -> SimConfig {
    SimConfig::new(5.0, -0.004, 10.0, 0.95, 0.5, FIVE_MINUTES_H)
}

/// Same as [`baseline_config`] with a different initial state of charge.
pub fn config_with_soc(initial_soc: f64) -> SimConfig {
    SimConfig {
        initial_soc,
        ..baseline_config()
    }
}

/// Midnight of 2024-01-01.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start timestamp")
}

/// A record `index` five-minute intervals after [`start`].
pub fn record(index: i64, irradiance: f64, ambient_temp_c: f64, load_kw: f64, price: f64) -> IntervalRecord {
    IntervalRecord {
        timestamp: start() + Duration::minutes(5 * index),
        irradiance,
        ambient_temp_c,
        load_kw,
        price_per_kwh: price,
    }
}

/// `n` consecutive five-minute records with identical conditions.
pub fn flat_series(n: usize, irradiance: f64, ambient_temp_c: f64, load_kw: f64, price: f64) -> Vec<IntervalRecord> {
    (0..n as i64)
        .map(|i| record(i, irradiance, ambient_temp_c, load_kw, price))
        .collect()
}

/// Absolute path of a file under the crate root.
pub fn fixture_path(relative: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Scratch file under the system temp directory, removed when dropped.
pub struct ScratchFile {
    path: std::path::PathBuf,
}

impl ScratchFile {
    /// Reserves a per-process path; nothing is created until written.
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("solar-sim-{}-{name}", std::process::id()));
        Self { path }
    }

    /// Creates the file with `contents`.
    pub fn with_contents(name: &str, contents: &str) -> Self {
        let file = Self::new(name);
        std::fs::write(&file.path, contents).expect("scratch file should be writable");
        file
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn arg(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(&self.path).expect("scratch file should be readable")
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
