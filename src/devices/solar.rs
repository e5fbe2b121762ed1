use crate::devices::types::{STC_IRRADIANCE_W_M2, STC_TEMP_C};

/// Computes instantaneous PV output from irradiance and ambient temperature.
///
/// Output scales linearly with irradiance relative to 1000 W/m² and is
/// derated by `temp_coefficient` per °C away from 25 °C. The result is
/// floored at zero: generation is never negative, whatever the inputs.
///
/// # Arguments
///
/// * `irradiance` - Plane-of-array irradiance (W/m²)
/// * `ambient_temp_c` - Ambient temperature (°C)
/// * `capacity_kw` - Rated array capacity (kWp)
/// * `temp_coefficient` - Fractional power change per °C (typically negative)
///
/// # Returns
///
/// Solar power in kilowatts, `>= 0.0`. NaN inputs yield NaN.
///
/// # Examples
///
/// ```
/// use solar_sim::devices::solar::compute;
///
/// assert!((compute(800.0, 25.0, 5.0, -0.004) - 4.0).abs() < 1e-12);
/// assert_eq!(compute(0.0, 40.0, 5.0, -0.004), 0.0);
/// ```
pub fn compute(irradiance: f64, ambient_temp_c: f64, capacity_kw: f64, temp_coefficient: f64) -> f64 {
    let temp_factor = 1.0 + temp_coefficient * (ambient_temp_c - STC_TEMP_C);
    let kw = capacity_kw * (irradiance / STC_IRRADIANCE_W_M2) * temp_factor;
    kw.max(0.0)
}

/// A PV array with fixed rating, evaluated per interval by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarArray {
    /// Rated capacity in kWp.
    pub capacity_kw: f64,

    /// Fractional power change per °C above the 25 °C reference.
    pub temp_coefficient: f64,
}

impl SolarArray {
    /// Creates a new array description.
    pub fn new(capacity_kw: f64, temp_coefficient: f64) -> Self {
        Self {
            capacity_kw,
            temp_coefficient,
        }
    }

    /// Generation in kW for the given irradiance and ambient temperature.
    pub fn power_kw(&self, irradiance: f64, ambient_temp_c: f64) -> f64 {
        compute(
            irradiance,
            ambient_temp_c,
            self.capacity_kw,
            self.temp_coefficient,
        )
    }

    /// Temperature derating factor at `ambient_temp_c`, before flooring.
    pub fn temp_factor(&self, ambient_temp_c: f64) -> f64 {
        1.0 + self.temp_coefficient * (ambient_temp_c - STC_TEMP_C)
    }
}
