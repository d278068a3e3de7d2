//! The `/users` resource: add a presenter, remove a presenter.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;
use crate::http::{engine_error, require_auth};

#[derive(Deserialize)]
pub struct NewUserRequest {
    pub name: String,
}

/// POST /users — add a new user one week after the current last slot.
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<Value>), Response> {
    require_auth(&state, &headers)?;
    let id = state
        .engine
        .create_user(&req.name, Utc::now().date_naive())
        .map_err(|e| engine_error("create_user", e))?;
    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

/// DELETE /users/{user_id} — remove a user and close the date gap.
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), Response> {
    require_auth(&state, &headers)?;
    let id = state
        .engine
        .delete_user(user_id)
        .map_err(|e| engine_error("delete_user", e))?;
    Ok((StatusCode::ACCEPTED, Json(json!({"id": id}))))
}
