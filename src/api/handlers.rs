//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, IntervalQuery, IntervalView, SummaryResponse};

/// Returns the run configuration and aggregate report.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config.clone(),
        report: state.report.clone(),
    })
}

/// Returns interval results, optionally filtered by index range.
///
/// `GET /intervals` → 200 + `Vec<IntervalView>` JSON
/// `GET /intervals?from=N&to=M` → filtered range (inclusive)
/// `GET /intervals?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_intervals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IntervalQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let views: Vec<IntervalView> = state
        .results
        .iter()
        .filter(|r| r.index >= from && r.index <= to)
        .map(IntervalView::from)
        .collect();

    Ok(Json(views))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{Duration, NaiveDateTime};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::report::SimReport;
    use crate::sim::types::{IntervalResult, SimConfig};

    fn make_test_state() -> Arc<AppState> {
        let config = SimConfig::new(5.0, -0.004, 10.0, 0.95, 0.5, 1.0);
        let results: Vec<IntervalResult> = (0..24)
            .map(|i| IntervalResult {
                index: i,
                timestamp: NaiveDateTime::default() + Duration::hours(i as i64),
                solar_kw: 2.0,
                load_kw: 1.0,
                battery_level_kwh: 5.0,
                battery_pct: 50.0,
                grid_import_kwh: 0.1,
                cost: 0.15,
                curtailed_kwh: 0.0,
                flag: None,
            })
            .collect();
        let report = SimReport::from_results(&results, config.interval_hours);
        Arc::new(AppState {
            config,
            report,
            results,
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let (status, json) = get_json("/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("config").is_some());
        assert_eq!(json["report"]["intervals"], 24);
        assert_eq!(json["config"]["battery_capacity_kwh"], 10.0);
    }

    #[tokio::test]
    async fn intervals_returns_all() {
        let (status, json) = get_json("/intervals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn intervals_range_query() {
        let (status, json) = get_json("/intervals?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(6)); // 5..=10
        assert_eq!(json[0]["index"], 5);
        assert_eq!(json[5]["index"], 10);
        assert_eq!(json[0]["timestamp"], "1970-01-01 05:00:00");
    }

    #[tokio::test]
    async fn intervals_invalid_range_returns_400() {
        let (status, json) = get_json("/intervals?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }
}
