use crate::job::MAX_INDEX;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid index value: {0}")]
    InvalidInput(String),

    #[error("Index {index} is outside the accepted range 0..={MAX_INDEX}")]
    OutOfRange { index: i64 },

    #[error("State store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Job log unavailable: {0}")]
    LogUnavailable(String),

    #[error("Event channel unavailable: {0}")]
    ChannelUnavailable(String),
}

impl CoreError {
    /// Whether the caller caused this error (as opposed to infrastructure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::InvalidInput(_) | CoreError::OutOfRange { .. })
    }
}
