//! HTTP handlers, grouped by resource.

pub mod page;
pub mod schedule;
pub mod users;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use rota_engine::EngineError;

use crate::app::AppState;

/// GET /health — liveness probe.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 401 with the `WWW-Authenticate: Basic` challenge.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic")],
        Json(json!({"error": "Incorrect username or password."})),
    )
        .into_response()
}

/// Run the Basic credential check; mutating handlers call this first.
pub fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    if crate::auth::verify_basic(&state.config.auth, headers) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

/// Translate an engine error into the HTTP error taxonomy:
/// validation 400, not-found 404, everything store-shaped 500.
pub fn engine_error(op: &'static str, e: EngineError) -> Response {
    let status = match &e {
        EngineError::LengthMismatch { .. }
        | EngineError::BadUserRef(_)
        | EngineError::DateParse(_)
        | EngineError::EmptyName => StatusCode::BAD_REQUEST,
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Inconsistent(_) | EngineError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    warn!(op, status = %status, error = %e, "request failed");
    (status, Json(json!({"error": e.to_string()}))).into_response()
}
