//! Aria Player Core
//!
//! Platform-agnostic domain types, backend traits, and error handling for Aria Player.
//!
//! This crate provides the building blocks shared by the HTTP client, the
//! playback controller, and the applications.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Album`, `Artist`, `Playlist` (catalog records)
//!   and `Track` (the playable item resolved from a song)
//! - **Core Traits**: `MusicService`, the boundary to the catalog/favorites backend
//! - **Error Handling**: Unified `AriaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use aria_core::types::{Song, Track, TrackId};
//!
//! let song: Song = serde_json::from_str(
//!     r#"{"_id": "s1", "name": "Intro", "file": "https://cdn.example.com/s1.mp3", "duration": "3:05"}"#,
//! ).unwrap();
//!
//! let track = Track::from_song(&song, &[], &[]);
//! assert_eq!(track.id, TrackId::new("s1"));
//! assert_eq!(track.duration.as_secs(), 185);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{AriaError, Result};
pub use traits::MusicService;

pub use types::{Album, Artist, Playlist, Song, Track, TrackId};
