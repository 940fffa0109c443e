//! Play history
//!
//! Every track start is reported to the backend once, fire-and-forget, and
//! appended to a bounded in-memory list for "recently played" views.

use crate::auth::AuthSession;
use aria_core::{MusicService, Track};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Recently started tracks with bounded size
///
/// Implements a ring buffer that automatically discards oldest entries.
#[derive(Debug, Clone)]
pub struct RecentPlays {
    /// History buffer (most recent = back)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl RecentPlays {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Add track to history
    ///
    /// If history is full, oldest track is discarded
    pub fn push(&mut self, track: Track) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
    }

    /// Most recent track
    pub fn last(&self) -> Option<&Track> {
        self.tracks.back()
    }

    /// All tracks, oldest first
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for RecentPlays {
    fn default() -> Self {
        Self::new(50)
    }
}

/// Reports track starts to the backend
///
/// No de-duplication: a looped track is reported on every start.
#[derive(Clone)]
pub struct PlayHistoryRecorder {
    service: Arc<dyn MusicService>,
    auth: AuthSession,
    record_plays: bool,
    recent: Arc<Mutex<RecentPlays>>,
    tracker: TaskTracker,
}

impl PlayHistoryRecorder {
    /// Create a recorder
    pub fn new(
        service: Arc<dyn MusicService>,
        auth: AuthSession,
        history_size: usize,
        record_plays: bool,
    ) -> Self {
        Self {
            service,
            auth,
            record_plays,
            recent: Arc::new(Mutex::new(RecentPlays::new(history_size))),
            tracker: TaskTracker::new(),
        }
    }

    /// Note that `track` started playing
    ///
    /// Returns immediately; the backend call runs in the background and its
    /// failure is only logged.
    pub fn record(&self, track: &Track) {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(track.clone());

        if !self.record_plays {
            debug!(track_id = %track.id, "Play reporting disabled");
            return;
        }

        let Some(token) = self.auth.token() else {
            debug!(track_id = %track.id, "Not signed in, skipping play report");
            return;
        };

        let service = Arc::clone(&self.service);
        let track_id = track.id.clone();
        self.tracker.spawn(async move {
            match service.record_play(&token, &track_id).await {
                Ok(()) => debug!(%track_id, "Play recorded"),
                Err(e) => warn!(%track_id, error = %e, "Failed to record play"),
            }
        });
    }

    /// Recently started tracks, oldest first
    pub fn recent_plays(&self) -> Vec<Track> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    /// Wait for every in-flight report to finish
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
