#![allow(dead_code)]

/// Common test utilities and fixtures
use aria_core::{Album, AriaError, Artist, MusicService, Playlist, Result, Song, TrackId};
use aria_playback::{HeadlessEngine, Notice, PlaybackConfig, Player};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

/// Backend endpoints the fake can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Songs,
    Albums,
    Artists,
    Favorites,
    Playlists,
    RecordPlay,
    AddFavorite,
    RemoveFavorite,
}

/// A backend call as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Endpoint),
    RecordPlay { token: String, track_id: TrackId },
    AddFavorite { token: String, track_id: TrackId },
    RemoveFavorite { token: String, track_id: TrackId },
}

/// In-memory `MusicService`
#[derive(Default)]
pub struct FakeMusicService {
    songs: Mutex<Vec<Song>>,
    albums: Mutex<Vec<Album>>,
    artists: Mutex<Vec<Artist>>,
    favorites: Mutex<Vec<TrackId>>,
    playlists: Mutex<Vec<Playlist>>,
    failing: Mutex<HashSet<Endpoint>>,
    held_favorites: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeMusicService {
    pub fn with_songs(ids: &[&str]) -> Arc<Self> {
        let service = Self::default();
        *service.songs.lock().unwrap() = ids.iter().map(|id| song(id)).collect();
        Arc::new(service)
    }

    pub fn set_songs(&self, ids: &[&str]) {
        *self.songs.lock().unwrap() = ids.iter().map(|id| song(id)).collect();
    }

    pub fn set_favorites(&self, ids: &[&str]) {
        *self.favorites.lock().unwrap() = ids.iter().map(|id| TrackId::new(*id)).collect();
    }

    pub fn set_artists(&self, artists: Vec<Artist>) {
        *self.artists.lock().unwrap() = artists;
    }

    pub fn set_playlists(&self, playlists: Vec<Playlist>) {
        *self.playlists.lock().unwrap() = playlists;
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn succeed(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().remove(&endpoint);
    }

    /// Make favorites fetches read the list, then wait for the returned notify
    pub fn hold_favorites(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.held_favorites.lock().unwrap() = Some(release.clone());
        release
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn plays(&self) -> Vec<TrackId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::RecordPlay { track_id, .. } => Some(track_id),
                _ => None,
            })
            .collect()
    }

    pub fn favorite_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::AddFavorite { .. } | Call::RemoveFavorite { .. }
                )
            })
            .count()
    }

    fn check(&self, endpoint: Endpoint) -> Result<()> {
        if self.failing.lock().unwrap().contains(&endpoint) {
            Err(AriaError::Server {
                status: 500,
                message: format!("{:?} unavailable", endpoint),
            })
        } else {
            Ok(())
        }
    }

    fn list<T: Clone>(&self, endpoint: Endpoint, items: &Mutex<Vec<T>>) -> Result<Vec<T>> {
        self.calls.lock().unwrap().push(Call::List(endpoint));
        self.check(endpoint)?;
        Ok(items.lock().unwrap().clone())
    }
}

#[async_trait]
impl MusicService for FakeMusicService {
    async fn list_songs(&self) -> Result<Vec<Song>> {
        self.list(Endpoint::Songs, &self.songs)
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        self.list(Endpoint::Albums, &self.albums)
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.list(Endpoint::Artists, &self.artists)
    }

    async fn list_favorites(&self, _access_token: &str) -> Result<Vec<TrackId>> {
        let favorites = self.list(Endpoint::Favorites, &self.favorites);
        let held = self.held_favorites.lock().unwrap().clone();
        if let Some(release) = held {
            release.notified().await;
        }
        favorites
    }

    async fn list_playlists(&self, _access_token: &str) -> Result<Vec<Playlist>> {
        self.list(Endpoint::Playlists, &self.playlists)
    }

    async fn record_play(&self, access_token: &str, track_id: &TrackId) -> Result<()> {
        self.calls.lock().unwrap().push(Call::RecordPlay {
            token: access_token.to_string(),
            track_id: track_id.clone(),
        });
        self.check(Endpoint::RecordPlay)
    }

    async fn add_favorite(&self, access_token: &str, track_id: &TrackId) -> Result<()> {
        self.calls.lock().unwrap().push(Call::AddFavorite {
            token: access_token.to_string(),
            track_id: track_id.clone(),
        });
        tokio::task::yield_now().await;
        self.check(Endpoint::AddFavorite)
    }

    async fn remove_favorite(&self, access_token: &str, track_id: &TrackId) -> Result<()> {
        self.calls.lock().unwrap().push(Call::RemoveFavorite {
            token: access_token.to_string(),
            track_id: track_id.clone(),
        });
        tokio::task::yield_now().await;
        self.check(Endpoint::RemoveFavorite)
    }
}

/// Catalog song with a predictable file URL
pub fn song(id: &str) -> Song {
    Song {
        id: TrackId::new(id),
        title: format!("Song {}", id),
        artist_name: Some("Test Artist".to_string()),
        artist_id: None,
        album_id: None,
        file_url: format!("https://cdn.example.com/{}.mp3", id),
        image_url: None,
        duration_seconds: Some(180),
    }
}

pub fn ids(list: &[&str]) -> Vec<TrackId> {
    list.iter().map(|id| TrackId::new(*id)).collect()
}

/// A mounted player over the fake backend and a headless engine
pub struct Harness {
    pub player: Player,
    pub engine: Arc<HeadlessEngine>,
    pub service: Arc<FakeMusicService>,
    pub notices: broadcast::Receiver<Notice>,
}

impl Harness {
    pub async fn new(songs: &[&str]) -> Self {
        Self::with_config(songs, test_config()).await
    }

    pub async fn with_config(songs: &[&str], config: PlaybackConfig) -> Self {
        Self::build(FakeMusicService::with_songs(songs), HeadlessEngine::new(), config).await
    }

    pub async fn build(
        service: Arc<FakeMusicService>,
        engine: HeadlessEngine,
        config: PlaybackConfig,
    ) -> Self {
        let engine = Arc::new(engine);
        let backend: Arc<dyn MusicService> = service.clone();
        let player = Player::new(backend, engine.clone(), config);
        let notices = player.subscribe_notices();
        player.mount().await;

        Self {
            player,
            engine,
            service,
            notices,
        }
    }

    /// Build the queue `[ids...]` with the first track current and playing
    pub async fn queue(&self, list: &[&str]) {
        let session = self.player.session();
        if let Some((first, rest)) = list.split_first() {
            session.play_with_id(*first).await;
            for id in rest {
                session.add_to_queue(*id).await;
            }
        }
    }

    pub fn queue_ids(&self) -> Vec<TrackId> {
        self.player.session().state().queue.track_ids()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.player.session().state().queue.current_index()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::iter::from_fn(|| self.notices.try_recv().ok()).collect()
    }
}

/// Deterministic shuffle, no initial repeat
pub fn test_config() -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(7),
        ..PlaybackConfig::default()
    }
}
