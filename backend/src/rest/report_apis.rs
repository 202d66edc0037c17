//! # REST API for Daily Reports
//!
//! Single endpoint that serves the aggregated daily report for a child.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::report::ReportError;
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<String>,
}

/// Get the daily report for a child. `?date=YYYY-MM-DD` selects the day;
/// omitting it reports on today.
pub async fn daily_report(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(query): Query<DailyReportQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/children/{}/daily-report - date: {:?}",
        child_id, query.date
    );

    match state.report_service.daily_report(&child_id, query.date) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to build daily report: {}", e);
            let status = if e.downcast_ref::<ReportError>().is_some() {
                StatusCode::BAD_REQUEST
            } else if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
