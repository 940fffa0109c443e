//! Aria Player - Playback Session Controller
//!
//! Owns the play queue and drives an externally supplied playback engine,
//! keeping favorites and play history consistent with the backend.
//!
//! This crate provides:
//! - Immutable play queue with a current-track pointer
//! - Shuffle (current track kept playing) with exact order restoration
//! - Repeat modes (Off, Track, Queue)
//! - Optimistic favorites with rollback on failure
//! - Fire-and-forget play reporting plus a recent-plays list
//! - Catalog snapshot with per-collection failure isolation
//!
//! # Architecture
//!
//! `aria-playback` never outputs audio. The host supplies a
//! [`PlaybackEngine`] (a device media player, or [`HeadlessEngine`]) and a
//! [`MusicService`](aria_core::MusicService) backend; [`Player`] wires them
//! to the components below:
//!
//! - [`PlaybackSession`]: a single task that serializes every queue
//!   mutation and engine event
//! - [`FavoritesSynchronizer`]: two-phase favorite toggling
//! - [`PlayHistoryRecorder`]: reports each track start
//! - [`CatalogCache`]: resolves ids to playable tracks
//!
//! Operations never return errors to the caller. Failures are logged with
//! `tracing` and, where the user should know, broadcast as [`Notice`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_playback::{HeadlessEngine, PlaybackConfig, Player};
//! use std::sync::Arc;
//!
//! # async fn run(service: Arc<dyn aria_core::MusicService>) {
//! let player = Player::new(service, Arc::new(HeadlessEngine::new()), PlaybackConfig::default());
//! player.mount().await;
//!
//! let session = player.session();
//! session.play_with_id("64f0c0ffee").await;
//! session.add_to_queue("64f0c0ffef").await;
//! session.toggle_shuffle().await;
//!
//! println!("{:?}", session.state().current_track());
//! # }
//! ```

mod auth;
mod catalog;
pub mod engine;
mod error;
mod events;
mod favorites;
mod history;
mod player;
mod queue;
mod session;
mod shuffle;
pub mod types;

// Public exports
pub use auth::AuthSession;
pub use catalog::{CatalogCache, CatalogResource, CatalogSnapshot, RefreshReport};
pub use engine::{
    EngineCommand, EngineError, EngineEvent, EngineSubscription, EventBus, HeadlessEngine,
    PlaybackEngine, Progress,
};
pub use error::{PlaybackError, Result};
pub use events::{Notice, NoticeKind};
pub use favorites::{FavoriteOutcome, FavoriteSet, FavoritesSynchronizer};
pub use history::{PlayHistoryRecorder, RecentPlays};
pub use player::Player;
pub use queue::{EntryKey, Queue, QueueEntry};
pub use session::{PlaybackSession, SessionState};
pub use shuffle::{restore_order, shuffle_around_current, ShuffleState};
pub use types::{EngineConfig, PlaybackConfig, PlaybackState, RepeatMode};
