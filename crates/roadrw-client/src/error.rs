//! Client error types for the Road RW API client

use std::fmt;

use serde::Serialize;

/// Uniform shape of a failed API call, as handed to pages and services.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    pub message: String,
    pub url: String,
    pub method: String,
    pub environment: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} {} returned {}: {} [{}]",
                self.method, self.url, status, self.message, self.environment
            ),
            None => write!(
                f,
                "{} {} failed: {} [{}]",
                self.method, self.url, self.message, self.environment
            ),
        }
    }
}

/// Rejected configuration input. Raised before any shared state is touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    #[error("API base URL must start with http:// or https://: {0}")]
    InvalidScheme(String),

    #[error("API base URL is not a valid absolute URL: {0}")]
    MalformedUrl(String),

    #[error("request timeout must be at least {min}ms, got {actual}ms")]
    TimeoutTooShort { min: u64, actual: u64 },

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Error type for API client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("session expired: {0}")]
    AuthExpired(ErrorInfo),

    #[error("transport error: {0}")]
    Transport(ErrorInfo),

    #[error("backend error: {0}")]
    Backend(ErrorInfo),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// The uniform error shape, for errors that came out of a request.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            ClientError::AuthExpired(info)
            | ClientError::Transport(info)
            | ClientError::Backend(info) => Some(info),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.info().and_then(|info| info.status)
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
