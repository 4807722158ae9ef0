//! Sentimeter error types

use std::time::Duration;

/// Sentimeter error types
#[derive(Debug, thiserror::Error)]
pub enum SentimeterError {
    // Backend/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data error: {0}")]
    DataError(String),

    #[error("empty response from sentiment backend")]
    EmptyResponse,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing credentials for {0}")]
    MissingCredentials(&'static str),

    /// The backend could not be constructed; every call reports this.
    #[error("sentiment backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    // Snapshot storage errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentimeterError {
    /// Whether this error came from the network or the remote service
    /// rather than from local configuration or data.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SentimeterError::Http(_)
                | SentimeterError::Api { .. }
                | SentimeterError::RateLimited { .. }
                | SentimeterError::AuthenticationFailed
                | SentimeterError::EmptyResponse
        )
    }
}

/// Result type alias for Sentimeter operations
pub type Result<T> = std::result::Result<T, SentimeterError>;
