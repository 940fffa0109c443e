//! Composition root
//!
//! [`Player`] builds every component once and wires them together. Hosts
//! create one per process and pass it (or the component handles it hands
//! out) to whatever needs it; there is no global instance.

use crate::auth::AuthSession;
use crate::catalog::{CatalogCache, CatalogResource, RefreshReport};
use crate::engine::PlaybackEngine;
use crate::error::{surface, PlaybackError};
use crate::events::Notice;
use crate::favorites::{FavoriteOutcome, FavoritesSynchronizer};
use crate::history::PlayHistoryRecorder;
use crate::session::PlaybackSession;
use crate::types::PlaybackConfig;
use aria_core::{MusicService, TrackId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const NOTICE_CAPACITY: usize = 64;

/// The assembled playback controller
pub struct Player {
    auth: AuthSession,
    catalog: CatalogCache,
    favorites: FavoritesSynchronizer,
    history: PlayHistoryRecorder,
    session: PlaybackSession,
    notices: broadcast::Sender<Notice>,
}

impl Player {
    /// Wire up a player
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        service: Arc<dyn MusicService>,
        engine: Arc<dyn PlaybackEngine>,
        config: PlaybackConfig,
    ) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let auth = AuthSession::default();
        let catalog = CatalogCache::new(Arc::clone(&service));
        let favorites =
            FavoritesSynchronizer::new(Arc::clone(&service), auth.clone(), notices.clone());
        let history = PlayHistoryRecorder::new(
            service,
            auth.clone(),
            config.history_size,
            config.record_plays,
        );
        let session = PlaybackSession::spawn(
            engine,
            catalog.clone(),
            history.clone(),
            notices.clone(),
            &config,
        );

        Self {
            auth,
            catalog,
            favorites,
            history,
            session,
            notices,
        }
    }

    /// Set up the engine and load the catalog
    ///
    /// Returns whether the engine is ready. The catalog loads either way.
    pub async fn mount(&self) -> bool {
        let (ready, _) = tokio::join!(self.session.initialize(), self.refresh());
        info!(ready, "Player mounted");
        ready
    }

    /// Replace the access token
    ///
    /// On change the catalog is refetched and the favorite set rebuilt.
    pub async fn set_access_token(&self, token: Option<String>) -> RefreshReport {
        if !self.auth.set_token(token) {
            debug!("Access token unchanged");
            return RefreshReport::default();
        }
        self.refresh().await
    }

    /// Refetch the catalog and rebuild favorites
    ///
    /// Failed collections are surfaced as network notices and left empty.
    pub async fn refresh(&self) -> RefreshReport {
        let token = self.auth.token();
        let generation = self.favorites.generation();
        let report = self.catalog.refresh(token.as_deref()).await;
        if report.superseded {
            return report;
        }

        for (resource, source) in &report.failures {
            surface(
                PlaybackError::Network {
                    resource: *resource,
                    source: source.clone(),
                },
                &self.notices,
            );
        }

        if !report.failed(CatalogResource::Favorites) {
            let ids = self.catalog.snapshot().favorites.clone();
            if token.is_none() {
                self.favorites.replace_all(ids).await;
            } else {
                self.favorites.replace_if_unchanged(generation, ids).await;
            }
        }
        report
    }

    /// Flip a track's favorite state
    pub async fn toggle_favorite(&self, id: impl Into<TrackId>) -> FavoriteOutcome {
        self.favorites.toggle_favorite(&id.into()).await
    }

    /// Playback session handle
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Favorites synchronizer
    pub fn favorites(&self) -> &FavoritesSynchronizer {
        &self.favorites
    }

    /// Catalog cache
    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    /// Access token holder
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// Play history recorder
    pub fn history(&self) -> &PlayHistoryRecorder {
        &self.history
    }

    /// Receive user-facing notices from every component
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Stop the session and wait for pending play reports
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
        self.history.flush().await;
        info!("Player shut down");
    }
}
