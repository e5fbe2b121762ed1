//! Synthetic input series for running without measured data.
//!
//! Produces a seeded, reproducible sequence of [`IntervalRecord`]s: clear-sky
//! irradiance shaped as a half-sine between sunrise and sunset with a noisy
//! cloud multiplier, a sinusoidal daily temperature, a sinusoidal household
//! load with Gaussian noise, and a two-level time-of-use price.

use std::f64::consts::PI;

use chrono::{Duration, NaiveDateTime, Timelike};
use rand::{SeedableRng, rngs::StdRng};

use crate::config::ProfileConfig;
use crate::devices::types::{daylight_frac, gaussian_noise};
use crate::sim::types::IntervalRecord;

/// Hour at which the daily temperature curve peaks.
const TEMP_PEAK_HR: f64 = 14.0;

/// Generates `config.days` days of records at `interval_minutes` spacing.
///
/// # Arguments
///
/// * `config` - Profile shape parameters
/// * `interval_minutes` - Spacing between records (must be > 0)
///
/// # Returns
///
/// `days * round(1440 / interval_minutes)` records starting at midnight of
/// `config.start_date`; empty when `interval_minutes` is not positive.
pub fn generate(config: &ProfileConfig, interval_minutes: f64) -> Vec<IntervalRecord> {
    if !(interval_minutes > 0.0) {
        return Vec::new();
    }
    let per_day = (1440.0 / interval_minutes).round() as usize;
    let total = per_day * config.days;
    let step = Duration::milliseconds((interval_minutes * 60_000.0).round() as i64);
    let start = config.start_date.and_time(chrono::NaiveTime::MIN);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(total);
    let mut timestamp = start;
    for _ in 0..total {
        records.push(record_at(config, timestamp, &mut rng));
        timestamp += step;
    }
    records
}

/// Builds one record for the interval starting at `timestamp`.
fn record_at(config: &ProfileConfig, timestamp: NaiveDateTime, rng: &mut StdRng) -> IntervalRecord {
    let hour = hour_of_day(timestamp);

    let clear_sky = config.peak_irradiance * daylight_frac(hour, config.sunrise_hr, config.sunset_hr);
    let cloud = (1.0 + gaussian_noise(rng, config.cloud_noise_std)).clamp(0.0, 1.2);
    let irradiance = clear_sky * cloud;

    let ambient_temp_c =
        config.temp_mean_c + config.temp_amp_c * (2.0 * PI * (hour - TEMP_PEAK_HR) / 24.0).cos();

    let diurnal = (2.0 * PI * (hour - config.load_peak_hr) / 24.0).cos();
    let load_kw = (config.load_base_kw
        + config.load_amp_kw * diurnal
        + gaussian_noise(rng, config.load_noise_std))
    .max(0.0);

    let price_per_kwh = if hour >= config.peak_start_hr && hour < config.peak_end_hr {
        config.price_peak
    } else {
        config.price_offpeak
    };

    IntervalRecord {
        timestamp,
        irradiance,
        ambient_temp_c,
        load_kw,
        price_per_kwh,
    }
}

/// Fractional hour of day (0.0 to 24.0).
fn hour_of_day(timestamp: NaiveDateTime) -> f64 {
    let secs = timestamp.num_seconds_from_midnight();
    f64::from(secs) / 3600.0
}
