//! REST API for a completed simulation run.
//!
//! Provides two GET endpoints:
//! - `/summary`: run configuration and aggregate report
//! - `/intervals`: per-interval results with optional index range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::report::SimReport;
use crate::sim::types::{IntervalResult, SimConfig};

pub use types::{ErrorResponse, IntervalQuery, IntervalView, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`; all data is read-only.
pub struct AppState {
    /// Run configuration.
    pub config: SimConfig,
    /// Aggregate report.
    pub report: SimReport,
    /// Per-interval results.
    pub results: Vec<IntervalResult>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/intervals", get(handlers::get_intervals))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
