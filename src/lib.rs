//! Household PV + battery energy-balance simulator.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
/// CSV ingestion and export.
pub mod io;
pub mod profile;
/// Energy-balance engine, validation, and reporting.
pub mod sim;
pub mod telemetry;
