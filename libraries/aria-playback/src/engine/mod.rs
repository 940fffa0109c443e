//! Playback engine boundary
//!
//! The session never decodes or outputs audio itself. It drives a
//! [`PlaybackEngine`] supplied by the host (a platform media player, or
//! [`HeadlessEngine`] for terminals and tests) and listens to the events the
//! engine emits through an [`EngineSubscription`].

mod headless;

pub use headless::HeadlessEngine;

use crate::types::{EngineConfig, PlaybackState, RepeatMode};
use aria_core::{Track, TrackId};
use async_trait::async_trait;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Result type for engine commands
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Engine command names, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCommand {
    Setup,
    Enqueue,
    ReplaceQueue,
    ReorderQueue,
    SkipToIndex,
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    SeekTo,
    SetRepeatMode,
    Progress,
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineCommand::Setup => "setup",
            EngineCommand::Enqueue => "enqueue",
            EngineCommand::ReplaceQueue => "replace queue",
            EngineCommand::ReorderQueue => "reorder queue",
            EngineCommand::SkipToIndex => "skip to index",
            EngineCommand::Play => "play",
            EngineCommand::Pause => "pause",
            EngineCommand::SkipToNext => "skip to next",
            EngineCommand::SkipToPrevious => "skip to previous",
            EngineCommand::SeekTo => "seek",
            EngineCommand::SetRepeatMode => "set repeat mode",
            EngineCommand::Progress => "progress",
        };
        f.write_str(name)
    }
}

/// Errors reported by a playback engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A command was issued before `setup` succeeded
    #[error("Playback engine is not initialized")]
    NotInitialized,

    /// One-time setup failed
    #[error("Playback engine setup failed: {0}")]
    Setup(String),

    /// The engine refused a command
    #[error("Engine rejected {command}: {reason}")]
    Rejected {
        command: EngineCommand,
        reason: String,
    },

    /// Index outside the engine's queue
    #[error("Invalid queue index: {0}")]
    InvalidIndex(usize),
}

/// Playback position of the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Elapsed time
    pub position: Duration,
    /// Track length (zero when unknown)
    pub duration: Duration,
}

/// Events emitted by a playback engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The active queue item changed
    ///
    /// Carries the id of the new track so listeners can discard events
    /// that refer to a queue they have since replaced.
    TrackChanged {
        index: Option<usize>,
        track_id: Option<TrackId>,
    },

    /// Transport state changed
    PlaybackStateChanged(PlaybackState),

    /// Playback of the current item failed (decode, network, output)
    PlaybackFailed { message: String },
}

/// Capability surface the session drives
///
/// Implementations must deliver events to each subscriber in emission order.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// One-time initialization
    async fn setup(&self, config: &EngineConfig) -> EngineResult<()>;

    /// Append a track to the engine queue
    async fn enqueue(&self, track: &Track) -> EngineResult<()>;

    /// Replace the engine queue; playback moves to the first track
    async fn replace_queue(&self, tracks: &[Track]) -> EngineResult<()>;

    /// Replace the queue order without interrupting the current item
    ///
    /// `tracks[current_index]` must be the item currently loaded.
    async fn reorder_queue(&self, tracks: &[Track], current_index: usize) -> EngineResult<()>;

    /// Jump to a queue position
    async fn skip_to_index(&self, index: usize) -> EngineResult<()>;

    /// Start or resume playback
    async fn play(&self) -> EngineResult<()>;

    /// Pause playback
    async fn pause(&self) -> EngineResult<()>;

    /// Advance to the next item (end-of-queue behavior follows the repeat mode)
    async fn skip_to_next(&self) -> EngineResult<()>;

    /// Go back to the previous item
    async fn skip_to_previous(&self) -> EngineResult<()>;

    /// Seek within the current item; the engine clamps the position
    async fn seek_to(&self, position: Duration) -> EngineResult<()>;

    /// Set end-of-track/end-of-queue behavior
    async fn set_repeat_mode(&self, mode: RepeatMode) -> EngineResult<()>;

    /// Current position
    async fn progress(&self) -> EngineResult<Progress>;

    /// Subscribe to engine events
    fn subscribe(&self) -> EngineSubscription;
}

/// Receiving end of an engine event stream
///
/// Dropping the subscription, or calling [`EngineSubscription::unsubscribe`],
/// detaches it from the engine.
#[derive(Debug)]
pub struct EngineSubscription {
    receiver: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineSubscription {
    /// Wait for the next event; `None` once the engine is gone
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.receiver.recv().await
    }

    /// Next already-delivered event, if any
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.receiver.try_recv().ok()
    }

    /// Stop receiving events
    pub fn unsubscribe(mut self) {
        self.receiver.close();
    }
}

/// Fan-out of engine events to subscribers
///
/// Closed subscribers are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<EngineEvent>>>,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> EngineSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        EngineSubscription { receiver }
    }

    /// Deliver an event to every live subscriber
    pub fn emit(&self, event: EngineEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Number of subscribers still attached
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }
}
