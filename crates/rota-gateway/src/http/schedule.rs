//! The `/schedule` resource: public read, authenticated bulk update and
//! rotation.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use rota_engine::ScheduleView;

use crate::app::AppState;
use crate::http::{engine_error, require_auth};

/// Bulk reassignment payload: parallel lists of frontend user refs
/// (`"<prefix>-<id>"`) and `MM/DD/YYYY` date strings.
#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub users: Vec<String>,
    pub dates: Vec<String>,
}

/// GET /schedule — retrieve the saved schedule.
pub async fn get_schedule_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScheduleView>, Response> {
    let view = state
        .engine
        .get_schedule()
        .map_err(|e| engine_error("get_schedule", e))?;
    Ok(Json(view))
}

/// POST /schedule — apply a bulk date reassignment atomically.
pub async fn update_schedule_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<(StatusCode, Json<Value>), Response> {
    require_auth(&state, &headers)?;
    let count = state
        .engine
        .update_schedule(&req.users, &req.dates)
        .map_err(|e| engine_error("update_schedule", e))?;
    Ok((StatusCode::ACCEPTED, Json(json!({"count": count}))))
}

/// PUT /schedule — rotate dates that are older than the current date.
pub async fn rotate_schedule_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), Response> {
    require_auth(&state, &headers)?;
    let count = state
        .engine
        .rotate(Utc::now().date_naive())
        .map_err(|e| engine_error("rotate_schedule", e))?;
    Ok((StatusCode::ACCEPTED, Json(json!({"count": count}))))
}
