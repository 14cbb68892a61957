//! Handlers for the `/values` resource.
//!
//! Submission replies as soon as the job is accepted; the result shows up
//! in `/values/current` whenever the worker gets to it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /values`. The index arrives as a string.
#[derive(Debug, Deserialize)]
pub struct SubmitIndex {
    pub index: String,
}

/// Acknowledgment returned once a job is accepted.
#[derive(Debug, Serialize)]
pub struct Acknowledgment {
    pub working: bool,
}

/// POST /values
///
/// Validate the index, write its placeholder, notify the worker and record
/// the submission. Replies before any computation starts.
pub async fn submit_value(
    State(state): State<AppState>,
    body: Result<Json<SubmitIndex>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!(index = %input.index, "Submission received");

    state.gateway.submit(&input.index).await?;

    Ok(Json(Acknowledgment { working: true }))
}

/// GET /values/all
///
/// Every accepted submission as `{ "number": n }`, oldest first.
pub async fn list_all(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let jobs = state.queries.list_accepted().await?;
    Ok(Json(jobs))
}

/// GET /values/current
///
/// The state store snapshot: index string to placeholder or result.
pub async fn current(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.queries.current_snapshot().await?;
    Ok(Json(snapshot))
}
