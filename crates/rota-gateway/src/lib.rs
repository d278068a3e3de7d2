//! `rota-gateway` — axum HTTP surface for the presentation scheduler.
//!
//! Library form exists so integration tests can assemble the router without
//! going through `main`.

pub mod app;
pub mod auth;
pub mod http;
