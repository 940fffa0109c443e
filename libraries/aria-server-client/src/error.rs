//! Error types for the Aria server client.

use aria_core::AriaError;
use thiserror::Error;

/// Errors that can occur when interacting with the Aria backend.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required, or the token was rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;

impl From<ServerClientError> for AriaError {
    fn from(err: ServerClientError) -> Self {
        match err {
            ServerClientError::ServerError { status, message } => {
                AriaError::Server { status, message }
            }
            ServerClientError::AuthRequired => AriaError::AuthRequired,
            ServerClientError::ParseError(msg) => AriaError::Parse(msg),
            ServerClientError::ServerUnreachable(msg) | ServerClientError::InvalidUrl(msg) => {
                AriaError::Network(msg)
            }
            ServerClientError::Request(e) => {
                if e.is_decode() {
                    AriaError::Parse(e.to_string())
                } else {
                    AriaError::Network(e.to_string())
                }
            }
        }
    }
}
