//! File input and output around the engine.

/// CSV export of per-interval results.
pub mod export;
/// CSV ingestion of interval time series.
pub mod ingest;
