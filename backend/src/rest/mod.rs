//! REST surface for the nestling backend.
//!
//! Thin axum handlers over the domain services: log the request, call the
//! service, map the outcome to a status code.

pub mod child_apis;
pub mod record_apis;
pub mod report_apis;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::domain::{ChildService, RecordService, ReportService};
use crate::storage::csv::CsvConnection;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub record_service: RecordService,
    pub report_service: ReportService,
}

impl AppState {
    /// Create application state with all services backed by one connection
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            child_service: ChildService::new(connection.clone()),
            record_service: RecordService::new(connection.clone()),
            report_service: ReportService::new(connection),
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/children",
            post(child_apis::create_child).get(child_apis::list_children),
        )
        .route(
            "/children/:child_id",
            get(child_apis::get_child)
                .put(child_apis::update_child)
                .delete(child_apis::delete_child),
        )
        .route(
            "/children/:child_id/sleep",
            get(record_apis::list_sleep).post(record_apis::add_sleep),
        )
        .route(
            "/children/:child_id/sleep/:record_id",
            delete(record_apis::delete_sleep),
        )
        .route(
            "/children/:child_id/feeding",
            get(record_apis::list_feeding).post(record_apis::add_feeding),
        )
        .route(
            "/children/:child_id/feeding/:record_id",
            delete(record_apis::delete_feeding),
        )
        .route(
            "/children/:child_id/nappy",
            get(record_apis::list_nappy_changes).post(record_apis::add_nappy_change),
        )
        .route(
            "/children/:child_id/nappy/:record_id",
            delete(record_apis::delete_nappy_change),
        )
        .route(
            "/children/:child_id/medication",
            get(record_apis::list_medication).post(record_apis::add_medication),
        )
        .route(
            "/children/:child_id/medication/:record_id",
            delete(record_apis::delete_medication),
        )
        .route(
            "/children/:child_id/temperature",
            get(record_apis::list_temperature).post(record_apis::add_temperature),
        )
        .route(
            "/children/:child_id/temperature/:record_id",
            delete(record_apis::delete_temperature),
        )
        .route(
            "/children/:child_id/growth",
            get(record_apis::list_growth).post(record_apis::add_growth),
        )
        .route(
            "/children/:child_id/growth/:record_id",
            delete(record_apis::delete_growth),
        )
        .route(
            "/children/:child_id/daily-report",
            get(report_apis::daily_report),
        );

    Router::new().nest("/api", api_routes).with_state(state)
}
