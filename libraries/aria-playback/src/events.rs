//! User-facing notices
//!
//! Failures never escape the controller as errors. The ones a user should
//! hear about are broadcast as [`Notice`]s; everything else is only logged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeKind {
    /// The playback engine could not be set up; playback is unavailable
    Setup,

    /// A catalog collection failed to load and is shown empty
    Network,

    /// The engine refused a transport command
    PlaybackCommand,

    /// A favorite change was rolled back
    FavoriteSync,

    /// The action needs a signed-in user
    AuthRequired,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Category
    pub kind: NoticeKind,

    /// Human-readable text
    pub message: String,
}

impl Notice {
    /// Create a notice
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
