//! Device models for the PV + battery system.

/// Home battery storage model.
pub mod battery;
/// Solar photovoltaic generation model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use battery::{BatteryState, ChargeOutcome};
pub use solar::SolarArray;
