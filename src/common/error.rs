//! Error types for mvctl

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid snapshot query: {0}")]
    InvalidQuery(String),

    // === Inventory Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    // === Network Errors ===
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Operation timeout: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    ///
    /// The client never retries on its own; callers wrapping operations in
    /// their own retry policy use this to decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout(_) => true,
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Does this error mean the caller passed bad arguments?
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidParameter(_) | Error::InvalidQuery(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
