use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use fibber_core::error::CoreError;
use fibber_core::job::MAX_INDEX;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain and backend errors and adds
/// a variant for rejected request bodies. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fibber_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const SANITIZED_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidInput(raw) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_INPUT",
                    format!("unable to parse index value: {raw}"),
                ),
                CoreError::OutOfRange { index } => (
                    StatusCode::BAD_REQUEST,
                    "OUT_OF_RANGE",
                    format!("index {index} is out of range, must be between 0 and {MAX_INDEX}"),
                ),
                CoreError::StoreUnavailable(msg)
                | CoreError::LogUnavailable(msg)
                | CoreError::ChannelUnavailable(msg) => {
                    tracing::error!(error = %msg, kind = %core, "Backend failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        SANITIZED_MESSAGE.to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
