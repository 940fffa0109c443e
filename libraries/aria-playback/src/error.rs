//! Error types for playback management

use crate::catalog::CatalogResource;
use crate::engine::{EngineCommand, EngineError};
use crate::events::{Notice, NoticeKind};
use aria_core::{AriaError, TrackId};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

/// Playback errors
///
/// Public controller operations never return these; they are caught where
/// they occur and handed to [`surface`].
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// Engine setup failed; the session stays not-ready
    #[error("Playback is unavailable: {0}")]
    Setup(#[source] EngineError),

    /// A catalog collection could not be fetched
    #[error("Could not load {resource}: {source}")]
    Network {
        resource: CatalogResource,
        #[source]
        source: AriaError,
    },

    /// The engine rejected a transport command
    #[error("Could not {command}: {source}")]
    Command {
        command: EngineCommand,
        #[source]
        source: EngineError,
    },

    /// The engine reported that playback of the current item failed
    #[error("Playback failed: {0}")]
    Engine(String),

    /// The server rejected a favorite change, which was rolled back
    #[error("Could not update favorite {track_id}: {source}")]
    FavoriteSync {
        track_id: TrackId,
        #[source]
        source: AriaError,
    },

    /// The action needs an access token
    #[error("Sign in to {action}")]
    AuthRequired { action: &'static str },

    /// The engine is not set up
    #[error("Player is not ready")]
    NotReady,

    /// The id is not in the catalog
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),
}

impl PlaybackError {
    /// The notice shown to the user, if any
    pub fn notice(&self) -> Option<Notice> {
        let kind = match self {
            PlaybackError::Setup(_) => NoticeKind::Setup,
            PlaybackError::Network { .. } => NoticeKind::Network,
            PlaybackError::Command { .. } | PlaybackError::Engine(_) => {
                NoticeKind::PlaybackCommand
            }
            PlaybackError::FavoriteSync { .. } => NoticeKind::FavoriteSync,
            PlaybackError::AuthRequired { .. } => NoticeKind::AuthRequired,
            PlaybackError::NotReady | PlaybackError::TrackNotFound(_) => return None,
        };
        Some(Notice::new(kind, self.to_string()))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Log an error and broadcast its notice
pub(crate) fn surface(err: PlaybackError, notices: &broadcast::Sender<Notice>) {
    match &err {
        PlaybackError::Setup(source) => error!(error = %source, "Playback engine setup failed"),
        PlaybackError::Network { resource, source } => {
            warn!(%resource, error = %source, "Catalog fetch failed");
        }
        PlaybackError::Command { command, source } => {
            warn!(%command, error = %source, "Engine command failed");
        }
        PlaybackError::Engine(message) => warn!(%message, "Engine reported playback failure"),
        PlaybackError::FavoriteSync { track_id, source } => {
            warn!(%track_id, error = %source, "Favorite change rolled back");
        }
        PlaybackError::AuthRequired { action } => debug!(action, "Authentication required"),
        PlaybackError::NotReady => debug!("Ignoring command, player not ready"),
        PlaybackError::TrackNotFound(id) => warn!(track_id = %id, "Track not in catalog"),
    }

    if let Some(notice) = err.notice() {
        // No receivers just means nobody is listening right now
        let _ = notices.send(notice);
    }
}
