use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Fixed liveness greeting.
pub const GREETING: &str = "Hi";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the state store is reachable.
    pub store_healthy: bool,
    /// Whether the job log is reachable.
    pub log_healthy: bool,
}

/// GET / -- confirms the gateway is reachable.
async fn liveness() -> &'static str {
    tracing::debug!("Liveness probe");
    GREETING
}

/// GET /health -- returns service and backend health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.queries.health().await;

    let status = if health.all_healthy() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy: health.store_healthy,
        log_healthy: health.log_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}
