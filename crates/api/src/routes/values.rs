//! Route definitions for the `/values` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::values;
use crate::state::AppState;

/// Routes for the `/values` resource.
///
/// ```text
/// POST   /values              -> submit_value
/// GET    /values/all          -> list_all
/// GET    /values/current      -> current
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/values", post(values::submit_value))
        .route("/values/all", get(values::list_all))
        .route("/values/current", get(values::current))
}
