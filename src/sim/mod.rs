/// Energy balance between PV, load, battery, and grid.
pub mod balance;
pub mod engine;
/// Aggregate report over a completed run.
pub mod report;
/// Parallel runs over configuration variants.
pub mod sweep;
pub mod types;
pub mod validate;

pub use engine::{EnergyBalanceEngine, RunError, run, run_checked};
pub use report::SimReport;
pub use types::{IntervalRecord, IntervalResult, SimConfig};
pub use validate::{DataPolicy, InputError};
