/// Core error types for Aria Player
use thiserror::Error;

/// Result type alias using `AriaError`
pub type Result<T> = std::result::Result<T, AriaError>;

/// Core error type for Aria Player
///
/// Backend implementations of [`crate::MusicService`] convert their own
/// errors into this type so the playback layer can stay transport-agnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AriaError {
    /// The backend could not be reached (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The call needs a session token and none was accepted
    #[error("Authentication required")]
    AuthRequired,

    /// The response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity ("Song", "Playlist", ...)
        entity: String,
        /// Identifier that was looked up
        id: String,
    },
}

impl AriaError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether retrying later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            AriaError::Server {
                status: 503,
                message: "maintenance".into()
            }
            .to_string(),
            "Server error (503): maintenance"
        );
        assert_eq!(
            AriaError::not_found("Song", "abc").to_string(),
            "Song not found: abc"
        );
        assert_eq!(AriaError::AuthRequired.to_string(), "Authentication required");
    }

    #[test]
    fn transient_classification() {
        assert!(AriaError::network("connection reset").is_transient());
        assert!(AriaError::Server {
            status: 502,
            message: String::new()
        }
        .is_transient());
        assert!(!AriaError::Server {
            status: 404,
            message: String::new()
        }
        .is_transient());
        assert!(!AriaError::AuthRequired.is_transient());
        assert!(!AriaError::parse("eof").is_transient());
    }
}
