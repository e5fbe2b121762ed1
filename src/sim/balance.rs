//! Per-interval energy balance between PV, load, battery, and grid.

use crate::devices::BatteryState;

/// Energy flows settled for one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    /// `energy_solar - energy_load` (kWh; positive = surplus).
    pub net_kwh: f64,
    /// Energy drawn from the grid (kWh, >= 0).
    pub grid_import_kwh: f64,
    /// Surplus discarded because the battery was full (kWh, >= 0).
    pub curtailed_kwh: f64,
}

/// Net energy over one interval from average solar and load power.
///
/// # Arguments
///
/// * `solar_kw` - Average PV output (kW)
/// * `load_kw` - Average household load (kW)
/// * `interval_hours` - Interval length (h)
///
/// # Returns
///
/// Net energy in kWh (positive = surplus, negative = deficit)
pub fn net_energy_kwh(solar_kw: f64, load_kw: f64, interval_hours: f64) -> f64 {
    let energy_solar = solar_kw * interval_hours;
    let energy_load = load_kw * interval_hours;
    energy_solar - energy_load
}

/// Routes one interval's net energy through the battery.
///
/// A surplus charges the battery at `charge_efficiency`; anything that does
/// not fit is discarded. A deficit (including exactly zero) discharges the
/// battery and whatever storage cannot cover becomes grid import.
pub fn settle(battery: &mut BatteryState, net_kwh: f64, charge_efficiency: f64) -> Settlement {
    if net_kwh > 0.0 {
        let outcome = battery.charge(net_kwh, charge_efficiency);
        Settlement {
            net_kwh,
            grid_import_kwh: 0.0,
            curtailed_kwh: outcome.curtailed_kwh,
        }
    } else {
        let shortfall = battery.discharge(-net_kwh);
        Settlement {
            net_kwh,
            grid_import_kwh: shortfall,
            curtailed_kwh: 0.0,
        }
    }
}

/// Cost of the energy imported in one interval.
pub fn interval_cost(grid_import_kwh: f64, price_per_kwh: f64) -> f64 {
    if grid_import_kwh == 0.0 {
        return 0.0;
    }
    grid_import_kwh * price_per_kwh
}
