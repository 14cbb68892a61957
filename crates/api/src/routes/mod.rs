pub mod health;
pub mod values;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// /                     liveness greeting (GET)
/// /health               backend health (GET)
///
/// /values               submit job (POST)
/// /values/all           list accepted jobs (GET)
/// /values/current       state store snapshot (GET)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(values::router())
}
