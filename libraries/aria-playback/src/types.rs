//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Playback state reported by the engine
///
/// Owned by the playback engine; the session only mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Engine not set up yet (or setup failed)
    #[default]
    Uninitialized,

    /// Set up, nothing started
    Ready,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Reached the end of the queue, or stopped explicitly
    Stopped,
}

/// Repeat mode
///
/// Cycles `Off -> Track -> Queue -> Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the current track
    Track,

    /// Loop the entire queue
    Queue,
}

impl RepeatMode {
    /// Next mode in the toggle cycle
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Queue,
            RepeatMode::Queue => RepeatMode::Off,
        }
    }
}

/// Options passed to [`crate::PlaybackEngine::setup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How often the engine reports progress, in milliseconds (default: 1000)
    pub progress_interval_ms: u64,

    /// Let the engine pause/resume on audio focus loss (default: true)
    pub auto_handle_interruptions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 1000,
            auto_handle_interruptions: true,
        }
    }
}

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Number of recently started tracks kept in memory (default: 50)
    pub history_size: usize,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Report started tracks to the backend (default: true)
    pub record_plays: bool,

    /// Fixed shuffle seed; random when unset (default: None)
    pub shuffle_seed: Option<u64>,

    /// Engine setup options
    pub engine: EngineConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            repeat: RepeatMode::Off,
            record_plays: true,
            shuffle_seed: None,
            engine: EngineConfig::default(),
        }
    }
}
