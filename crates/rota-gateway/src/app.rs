use axum::{
    routing::{delete, get, post},
    Router,
};
use rota_core::RotaConfig;
use rota_engine::ScheduleEngine;
use std::sync::Arc;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: RotaConfig,
    pub engine: ScheduleEngine,
}

impl AppState {
    pub fn new(config: RotaConfig, engine: ScheduleEngine) -> Self {
        Self { config, engine }
    }
}

/// Assemble the full Axum router.
///
/// CORS is wide open: reads are public and mutations are gated by Basic
/// auth, not origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::page::index_handler))
        .route("/health", get(crate::http::health_handler))
        .route(
            "/schedule",
            get(crate::http::schedule::get_schedule_handler)
                .post(crate::http::schedule::update_schedule_handler)
                .put(crate::http::schedule::rotate_schedule_handler),
        )
        .route("/users", post(crate::http::users::create_user_handler))
        .route(
            "/users/{user_id}",
            delete(crate::http::users::delete_user_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}
