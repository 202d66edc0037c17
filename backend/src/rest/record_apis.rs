//! # REST API for Event Records
//!
//! Add, list, and delete endpoints for the six record kinds. All kinds
//! share the same response mapping: 201 with the stored record on add,
//! 200 with the newest-first list, 204 on delete, 404 for an unknown
//! child or record, 400 for validation failures.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};

use crate::rest::AppState;
use shared::{
    AddFeedingRequest, AddGrowthRequest, AddMedicationRequest, AddNappyChangeRequest,
    AddSleepRequest, AddTemperatureRequest,
};

fn added_response<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => {
            error!("Failed to add record: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

fn list_response<T: Serialize>(result: Result<Vec<T>>) -> Response {
    match result {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            error!("Failed to list records: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

fn deleted_response(result: Result<bool>) -> Response {
    match result {
        Ok(true) => (StatusCode::NO_CONTENT, "").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Record not found").into_response(),
        Err(e) => {
            error!("Failed to delete record: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

// --- sleep ---

pub async fn add_sleep(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddSleepRequest>,
) -> Response {
    info!("POST /api/children/{}/sleep - request: {:?}", child_id, request);
    added_response(state.record_service.add_sleep(&child_id, request))
}

pub async fn list_sleep(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/sleep", child_id);
    list_response(state.record_service.list_sleep(&child_id))
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/sleep/{}", child_id, record_id);
    deleted_response(state.record_service.delete_sleep(&child_id, &record_id))
}

// --- feeding ---

pub async fn add_feeding(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddFeedingRequest>,
) -> Response {
    info!("POST /api/children/{}/feeding - request: {:?}", child_id, request);
    added_response(state.record_service.add_feeding(&child_id, request))
}

pub async fn list_feeding(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/feeding", child_id);
    list_response(state.record_service.list_feeding(&child_id))
}

pub async fn delete_feeding(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/feeding/{}", child_id, record_id);
    deleted_response(state.record_service.delete_feeding(&child_id, &record_id))
}

// --- nappy changes ---

pub async fn add_nappy_change(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddNappyChangeRequest>,
) -> Response {
    info!("POST /api/children/{}/nappy - request: {:?}", child_id, request);
    added_response(state.record_service.add_nappy_change(&child_id, request))
}

pub async fn list_nappy_changes(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/nappy", child_id);
    list_response(state.record_service.list_nappy_changes(&child_id))
}

pub async fn delete_nappy_change(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/nappy/{}", child_id, record_id);
    deleted_response(state.record_service.delete_nappy_change(&child_id, &record_id))
}

// --- medication ---

pub async fn add_medication(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddMedicationRequest>,
) -> Response {
    info!("POST /api/children/{}/medication - request: {:?}", child_id, request);
    added_response(state.record_service.add_medication(&child_id, request))
}

pub async fn list_medication(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/medication", child_id);
    list_response(state.record_service.list_medication(&child_id))
}

pub async fn delete_medication(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/medication/{}", child_id, record_id);
    deleted_response(state.record_service.delete_medication(&child_id, &record_id))
}

// --- temperature ---

pub async fn add_temperature(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddTemperatureRequest>,
) -> Response {
    info!("POST /api/children/{}/temperature - request: {:?}", child_id, request);
    added_response(state.record_service.add_temperature(&child_id, request))
}

pub async fn list_temperature(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/temperature", child_id);
    list_response(state.record_service.list_temperature(&child_id))
}

pub async fn delete_temperature(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/temperature/{}", child_id, record_id);
    deleted_response(state.record_service.delete_temperature(&child_id, &record_id))
}

// --- growth ---

pub async fn add_growth(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<AddGrowthRequest>,
) -> Response {
    info!("POST /api/children/{}/growth - request: {:?}", child_id, request);
    added_response(state.record_service.add_growth(&child_id, request))
}

pub async fn list_growth(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Response {
    info!("GET /api/children/{}/growth", child_id);
    list_response(state.record_service.list_growth(&child_id))
}

pub async fn delete_growth(
    State(state): State<AppState>,
    Path((child_id, record_id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/children/{}/growth/{}", child_id, record_id);
    deleted_response(state.record_service.delete_growth(&child_id, &record_id))
}
