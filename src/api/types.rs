//! API response and query types.
//!
//! Field names follow the CSV export columns for consistency across formats.

use serde::{Deserialize, Serialize};

use crate::sim::report::SimReport;
use crate::sim::types::{IntervalResult, SimConfig};

/// Run configuration together with its aggregate report.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Engine configuration.
    pub config: SimConfig,
    /// Aggregate report.
    pub report: SimReport,
}

/// One interval result using export column names.
///
/// - `solar_kw` → `solar_output_kw`
/// - `battery_pct` → `battery_percentage`
/// - `flag` → rendered message or `null`
#[derive(Debug, Serialize)]
pub struct IntervalView {
    /// Position in the input sequence.
    pub index: usize,
    /// Interval start, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// PV output (kW).
    pub solar_output_kw: f64,
    /// Household load (kW).
    pub load_kw: f64,
    /// Stored energy after the interval (kWh).
    pub battery_level_kwh: f64,
    /// Stored energy as a percentage of capacity.
    pub battery_percentage: f64,
    /// Grid import (kWh).
    pub grid_import_kwh: f64,
    /// Grid cost for the interval.
    pub cost: f64,
    /// Discarded surplus (kWh).
    pub curtailed_kwh: f64,
    /// Data-quality flag message.
    pub flag: Option<String>,
}

impl From<&IntervalResult> for IntervalView {
    fn from(r: &IntervalResult) -> Self {
        Self {
            index: r.index,
            timestamp: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            solar_output_kw: r.solar_kw,
            load_kw: r.load_kw,
            battery_level_kwh: r.battery_level_kwh,
            battery_percentage: r.battery_pct,
            grid_import_kwh: r.grid_import_kwh,
            cost: r.cost,
            curtailed_kwh: r.curtailed_kwh,
            flag: r.flag.as_ref().map(ToString::to_string),
        }
    }
}

/// Optional range query parameters for the intervals endpoint.
#[derive(Debug, Deserialize)]
pub struct IntervalQuery {
    /// First interval index (inclusive).
    pub from: Option<usize>,
    /// Last interval index (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::sim::validate::InputError;

    #[test]
    fn interval_view_maps_fields() {
        let result = IntervalResult {
            index: 5,
            timestamp: NaiveDateTime::default(),
            solar_kw: 4.0,
            load_kw: 20.0,
            battery_level_kwh: 3.6667,
            battery_pct: 36.667,
            grid_import_kwh: 0.0,
            cost: 0.0,
            curtailed_kwh: 0.0,
            flag: Some(InputError::UnevenSpacing {
                index: 5,
                expected_secs: 300,
                actual_secs: 900,
            }),
        };
        let view = IntervalView::from(&result);

        assert_eq!(view.index, 5);
        assert_eq!(view.timestamp, "1970-01-01 00:00:00");
        assert_eq!(view.solar_output_kw, 4.0); // solar_kw
        assert_eq!(view.battery_percentage, 36.667); // battery_pct
        assert_eq!(view.battery_level_kwh, 3.6667);
        assert!(view.flag.as_deref().is_some_and(|f| f.contains("900")));
    }
}
