//! Client error types

use routine_core::{RemoteError, RemoteErrorKind};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Request rejected by server-side validation
    #[error("{0}")]
    Validation(String),

    /// Server failure
    #[error("{0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for RemoteError {
    fn from(err: ClientError) -> Self {
        let kind = match &err {
            ClientError::Http(e) if e.is_decode() => RemoteErrorKind::InvalidResponse,
            ClientError::Http(_) | ClientError::Config(_) => RemoteErrorKind::Transport,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                RemoteErrorKind::InvalidResponse
            }
            ClientError::Unauthorized | ClientError::Forbidden(_) => RemoteErrorKind::Unauthorized,
            ClientError::NotFound(_) => RemoteErrorKind::NotFound,
            ClientError::Validation(_) => RemoteErrorKind::Rejected,
            ClientError::Internal(_) => RemoteErrorKind::Server,
        };
        RemoteError::new(kind, err.to_string())
    }
}
