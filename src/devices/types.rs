//! Shared helpers for device and profile models.

use rand::{Rng, rngs::StdRng};

/// Reference cell temperature for panel ratings (standard test conditions, °C).
pub const STC_TEMP_C: f64 = 25.0;

/// Irradiance at which a panel delivers its rated capacity (W/m²).
pub const STC_IRRADIANCE_W_M2: f64 = 1000.0;

/// Fraction of peak daylight at `hour` for a half-sine day between
/// `sunrise_hr` (inclusive) and `sunset_hr` (exclusive).
///
/// # Arguments
///
/// * `hour` - Hour of day, fractional (0.0 to 24.0)
/// * `sunrise_hr` - Hour at which daylight begins
/// * `sunset_hr` - Hour at which daylight ends
///
/// # Returns
///
/// A value in `[0.0, 1.0]`; zero outside daylight or when `sunset_hr <= sunrise_hr`.
pub fn daylight_frac(hour: f64, sunrise_hr: f64, sunset_hr: f64) -> f64 {
    if sunset_hr <= sunrise_hr || hour < sunrise_hr || hour >= sunset_hr {
        return 0.0;
    }
    let x = (hour - sunrise_hr) / (sunset_hr - sunrise_hr);
    (std::f64::consts::PI * x).sin().max(0.0)
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
