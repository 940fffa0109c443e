//! Favorites synchronization
//!
//! Toggling a favorite is a two-phase operation: the flip is applied to the
//! local set and published at once, then confirmed by the backend or
//! reverted if the backend refuses.

use crate::auth::AuthSession;
use crate::error::{surface, PlaybackError};
use crate::events::Notice;
use aria_core::{MusicService, TrackId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info};

/// Immutable set of favorited track ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: Arc<HashSet<TrackId>>,
}

impl FavoriteSet {
    /// Whether `id` is a favorite
    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favorites
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the ids (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.ids.iter()
    }

    /// A copy including `id`
    pub fn with(&self, id: &TrackId) -> Self {
        let mut ids = (*self.ids).clone();
        ids.insert(id.clone());
        Self { ids: Arc::new(ids) }
    }

    /// A copy without `id`
    pub fn without(&self, id: &TrackId) -> Self {
        let mut ids = (*self.ids).clone();
        ids.remove(id);
        Self { ids: Arc::new(ids) }
    }
}

impl FromIterator<TrackId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self {
            ids: Arc::new(iter.into_iter().collect()),
        }
    }
}

/// Result of [`FavoritesSynchronizer::toggle_favorite`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// Now a favorite
    Added,

    /// No longer a favorite
    Removed,

    /// No session; nothing changed and nothing was sent
    AuthRequired,

    /// The backend refused; the local flip was reverted
    RolledBack,
}

/// Keeps the local favorite set in step with the backend
#[derive(Clone)]
pub struct FavoritesSynchronizer {
    service: Arc<dyn MusicService>,
    auth: AuthSession,
    notices: broadcast::Sender<Notice>,
    set: Arc<watch::Sender<FavoriteSet>>,
    // One toggle at a time, so a revert never undoes a later change
    gate: Arc<Mutex<()>>,
    // Bumped whenever the backend confirms a toggle
    confirmed: Arc<AtomicU64>,
}

impl FavoritesSynchronizer {
    /// Create a synchronizer with an empty set
    pub fn new(
        service: Arc<dyn MusicService>,
        auth: AuthSession,
        notices: broadcast::Sender<Notice>,
    ) -> Self {
        let (set, _) = watch::channel(FavoriteSet::default());
        Self {
            service,
            auth,
            notices,
            set: Arc::new(set),
            gate: Arc::new(Mutex::new(())),
            confirmed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current favorites
    pub fn favorites(&self) -> FavoriteSet {
        self.set.borrow().clone()
    }

    /// Whether `id` is currently a favorite
    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.set.borrow().contains(id)
    }

    /// Watch the favorite set
    pub fn subscribe(&self) -> watch::Receiver<FavoriteSet> {
        self.set.subscribe()
    }

    /// Replace the whole set, e.g. after sign-in
    pub async fn replace_all(&self, ids: impl IntoIterator<Item = TrackId>) {
        let _gate = self.gate.lock().await;
        let set: FavoriteSet = ids.into_iter().collect();
        debug!(count = set.len(), "Favorites replaced");
        self.set.send_replace(set);
    }

    /// Count of toggles the backend has confirmed so far
    ///
    /// Take this before fetching the favorites list and pass it to
    /// [`replace_if_unchanged`](Self::replace_if_unchanged).
    pub fn generation(&self) -> u64 {
        self.confirmed.load(Ordering::Acquire)
    }

    /// Replace the whole set unless a toggle was confirmed since `generation`
    ///
    /// A list fetched before that confirmation no longer reflects the
    /// server, so it is dropped and the local set kept. Returns whether the
    /// set was replaced.
    pub async fn replace_if_unchanged(
        &self,
        generation: u64,
        ids: impl IntoIterator<Item = TrackId>,
    ) -> bool {
        let _gate = self.gate.lock().await;
        let current = self.confirmed.load(Ordering::Acquire);
        if current != generation {
            debug!(generation, current, "Dropping favorites fetched before a toggle");
            return false;
        }
        let set: FavoriteSet = ids.into_iter().collect();
        debug!(count = set.len(), "Favorites replaced");
        self.set.send_replace(set);
        true
    }

    /// Flip the favorite state of `id`
    pub async fn toggle_favorite(&self, id: &TrackId) -> FavoriteOutcome {
        let _gate = self.gate.lock().await;

        let Some(token) = self.auth.token() else {
            surface(
                PlaybackError::AuthRequired {
                    action: "favorite tracks",
                },
                &self.notices,
            );
            return FavoriteOutcome::AuthRequired;
        };

        let was_favorite = self.is_favorite(id);
        let current = self.favorites();
        let tentative = if was_favorite {
            current.without(id)
        } else {
            current.with(id)
        };
        self.set.send_replace(tentative);

        let result = if was_favorite {
            self.service.remove_favorite(&token, id).await
        } else {
            self.service.add_favorite(&token, id).await
        };

        match result {
            Ok(()) if was_favorite => {
                self.confirmed.fetch_add(1, Ordering::AcqRel);
                info!(track_id = %id, "Favorite removed");
                FavoriteOutcome::Removed
            }
            Ok(()) => {
                self.confirmed.fetch_add(1, Ordering::AcqRel);
                info!(track_id = %id, "Favorite added");
                FavoriteOutcome::Added
            }
            Err(source) => {
                let current = self.favorites();
                let reverted = if was_favorite {
                    current.with(id)
                } else {
                    current.without(id)
                };
                self.set.send_replace(reverted);
                surface(
                    PlaybackError::FavoriteSync {
                        track_id: id.clone(),
                        source,
                    },
                    &self.notices,
                );
                FavoriteOutcome::RolledBack
            }
        }
    }
}
