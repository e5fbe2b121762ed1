/// Energy held in the home battery during one simulation run.
///
/// `BatteryState` tracks a single scalar, the stored energy in kWh, and keeps
/// it within `[0, capacity_kwh]` through the charge and discharge paths
/// themselves. There is no power limit and no discharge loss: a deficit is
/// served one-for-one from storage until the battery is empty.
///
/// # Examples
///
/// ```
/// use solar_sim::devices::BatteryState;
///
/// let mut battery = BatteryState::new(10.0, 0.5);
/// assert_eq!(battery.stored_kwh(), 5.0);
///
/// let shortfall = battery.discharge(6.0);
/// assert_eq!(battery.stored_kwh(), 0.0);
/// assert_eq!(shortfall, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryState {
    capacity_kwh: f64,
    stored_kwh: f64,
}

/// What happened to a surplus offered to the battery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeOutcome {
    /// Energy added to storage after charging losses (kWh).
    pub stored_kwh: f64,
    /// Surplus that did not fit and was discarded, before losses (kWh).
    pub curtailed_kwh: f64,
}

impl BatteryState {
    /// Creates a battery at `capacity_kwh * initial_soc`.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Usable capacity (kWh, expected > 0)
    /// * `initial_soc` - Initial state of charge as a fraction (expected 0.0 to 1.0)
    ///
    /// Arguments are not checked here; [`crate::sim::types::SimConfig::validate`]
    /// rejects out-of-range values before a run starts.
    pub fn new(capacity_kwh: f64, initial_soc: f64) -> Self {
        Self {
            capacity_kwh,
            stored_kwh: capacity_kwh * initial_soc,
        }
    }

    /// Usable capacity in kWh.
    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Energy currently stored in kWh.
    pub fn stored_kwh(&self) -> f64 {
        self.stored_kwh
    }

    /// Remaining headroom in kWh.
    pub fn space_kwh(&self) -> f64 {
        self.capacity_kwh - self.stored_kwh
    }

    /// State of charge as a percentage of capacity.
    pub fn percent(&self) -> f64 {
        self.stored_kwh / self.capacity_kwh * 100.0
    }

    /// Offers a surplus to the battery.
    ///
    /// The stored amount is `surplus_kwh * efficiency`. If that exceeds the
    /// headroom the battery saturates at capacity and the remainder of the
    /// surplus is discarded; nothing is exported. At zero efficiency nothing
    /// is stored and the surplus is lost to charging, not curtailed.
    pub fn charge(&mut self, surplus_kwh: f64, efficiency: f64) -> ChargeOutcome {
        let to_store = surplus_kwh * efficiency;
        let space = self.space_kwh();

        if to_store <= space {
            self.stored_kwh += to_store;
            ChargeOutcome {
                stored_kwh: to_store,
                curtailed_kwh: 0.0,
            }
        } else {
            self.stored_kwh = self.capacity_kwh;
            ChargeOutcome {
                stored_kwh: space,
                curtailed_kwh: surplus_kwh - space / efficiency,
            }
        }
    }

    /// Draws `needed_kwh` from storage.
    ///
    /// # Returns
    ///
    /// The shortfall in kWh that storage could not cover, `0.0` when the
    /// battery held enough. On shortfall the battery is left empty.
    pub fn discharge(&mut self, needed_kwh: f64) -> f64 {
        if self.stored_kwh >= needed_kwh {
            self.stored_kwh -= needed_kwh;
            0.0
        } else {
            let shortfall = needed_kwh - self.stored_kwh;
            self.stored_kwh = 0.0;
            shortfall
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_battery_at_initial_soc() {
        let battery = BatteryState::new(10.0, 0.5);
        assert_eq!(battery.capacity_kwh(), 10.0);
        assert_eq!(battery.stored_kwh(), 5.0);
        assert_eq!(battery.space_kwh(), 5.0);
        assert_eq!(battery.percent(), 50.0);
    }

    #[test]
    fn charge_applies_efficiency() {
        let mut battery = BatteryState::new(10.0, 0.5);
        let outcome = battery.charge(0.25, 0.95);
        assert!((battery.stored_kwh() - 5.2375).abs() < 1e-12);
        assert!((outcome.stored_kwh - 0.2375).abs() < 1e-12);
        assert_eq!(outcome.curtailed_kwh, 0.0);
    }

    #[test]
    fn charge_saturates_at_capacity() {
        let mut battery = BatteryState::new(10.0, 0.99);
        let outcome = battery.charge(1.0, 0.95);
        assert_eq!(battery.stored_kwh(), 10.0);
        assert!((outcome.stored_kwh - 0.1).abs() < 1e-9);
        // 0.1 kWh stored needs 0.1/0.95 of surplus; the rest is discarded.
        assert!((outcome.curtailed_kwh - (1.0 - 0.1 / 0.95)).abs() < 1e-9);
    }

    #[test]
    fn exact_fit_is_not_saturation() {
        let mut battery = BatteryState::new(10.0, 0.9);
        let outcome = battery.charge(1.0, 1.0);
        assert!((battery.stored_kwh() - 10.0).abs() < 1e-12);
        assert_eq!(outcome.curtailed_kwh, 0.0);
    }

    #[test]
    fn zero_efficiency_stores_nothing() {
        for soc in [0.5, 1.0] {
            let mut battery = BatteryState::new(10.0, soc);
            let before = battery.stored_kwh();
            let outcome = battery.charge(2.0, 0.0);
            assert_eq!(battery.stored_kwh(), before);
            assert_eq!(outcome.stored_kwh, 0.0);
            assert_eq!(outcome.curtailed_kwh, 0.0);
        }
    }

    #[test]
    fn discharge_covered() {
        let mut battery = BatteryState::new(10.0, 0.5);
        let shortfall = battery.discharge(1.5);
        assert_eq!(shortfall, 0.0);
        assert!((battery.stored_kwh() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn discharge_exactly_empties() {
        let mut battery = BatteryState::new(10.0, 0.5);
        assert_eq!(battery.discharge(5.0), 0.0);
        assert_eq!(battery.stored_kwh(), 0.0);
    }

    #[test]
    fn discharge_shortfall_drains_to_zero() {
        let mut battery = BatteryState::new(10.0, 0.01);
        let shortfall = battery.discharge(2.0);
        assert_eq!(battery.stored_kwh(), 0.0);
        assert!((shortfall - 1.9).abs() < 1e-12);
    }

    #[test]
    fn empty_battery_passes_whole_deficit() {
        let mut battery = BatteryState::new(10.0, 0.0);
        assert_eq!(battery.discharge(0.7), 0.7);
        assert_eq!(battery.stored_kwh(), 0.0);
    }
}
