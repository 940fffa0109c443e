//! Catalog cache
//!
//! A read-only snapshot of the backend catalog, replaced wholesale on every
//! refresh. Track resolution for the session reads from the latest snapshot.

use aria_core::{Album, AriaError, Artist, MusicService, Playlist, Song, Track, TrackId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// One collection fetched during a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogResource {
    Songs,
    Albums,
    Artists,
    Favorites,
    Playlists,
}

impl fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatalogResource::Songs => "songs",
            CatalogResource::Albums => "albums",
            CatalogResource::Artists => "artists",
            CatalogResource::Favorites => "favorites",
            CatalogResource::Playlists => "playlists",
        })
    }
}

/// Everything fetched by one refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    /// Favorited song ids (empty when signed out)
    pub favorites: Vec<TrackId>,
    /// User playlists (empty when signed out)
    pub playlists: Vec<Playlist>,
}

impl CatalogSnapshot {
    /// Look up a song by id
    pub fn song(&self, id: &TrackId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == *id)
    }

    /// Resolve a song id into a playable track
    pub fn resolve(&self, id: &TrackId) -> Option<Track> {
        self.song(id)
            .map(|song| Track::from_song(song, &self.artists, &self.albums))
    }

    /// Resolve every song of a playlist, skipping ids not in the catalog
    pub fn playlist_tracks(&self, playlist: &Playlist) -> Vec<Track> {
        playlist
            .song_ids
            .iter()
            .filter_map(|id| self.resolve(id))
            .collect()
    }
}

/// Outcome of [`CatalogCache::refresh`]
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Collections that failed and were left empty
    pub failures: Vec<(CatalogResource, AriaError)>,

    /// A newer refresh finished first; this result was discarded
    pub superseded: bool,
}

impl RefreshReport {
    /// Whether every fetch succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether `resource` failed
    pub fn failed(&self, resource: CatalogResource) -> bool {
        self.failures.iter().any(|(r, _)| *r == resource)
    }
}

/// Holder of the current catalog snapshot
#[derive(Clone)]
pub struct CatalogCache {
    service: Arc<dyn MusicService>,
    snapshot: Arc<watch::Sender<Arc<CatalogSnapshot>>>,
    generation: Arc<AtomicU64>,
}

impl CatalogCache {
    /// Create an empty cache
    pub fn new(service: Arc<dyn MusicService>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(CatalogSnapshot::default()));
        Self {
            service,
            snapshot: Arc::new(snapshot),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Watch snapshot replacements
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Resolve a song id against the current snapshot
    pub fn resolve(&self, id: &TrackId) -> Option<Track> {
        self.snapshot.borrow().resolve(id)
    }

    /// Fetch everything again and replace the snapshot
    ///
    /// The five fetches run concurrently. User collections are skipped
    /// without a token. A failed fetch leaves only its own collection empty.
    pub async fn refresh(&self, access_token: Option<&str>) -> RefreshReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, authenticated = access_token.is_some(), "Refreshing catalog");

        let service = self.service.as_ref();
        let (songs, albums, artists, favorites, playlists) = tokio::join!(
            service.list_songs(),
            service.list_albums(),
            service.list_artists(),
            async {
                match access_token {
                    Some(token) => service.list_favorites(token).await,
                    None => Ok(Vec::new()),
                }
            },
            async {
                match access_token {
                    Some(token) => service.list_playlists(token).await,
                    None => Ok(Vec::new()),
                }
            },
        );

        let mut report = RefreshReport::default();
        let snapshot = CatalogSnapshot {
            songs: collect(CatalogResource::Songs, songs, &mut report),
            albums: collect(CatalogResource::Albums, albums, &mut report),
            artists: collect(CatalogResource::Artists, artists, &mut report),
            favorites: collect(CatalogResource::Favorites, favorites, &mut report),
            playlists: collect(CatalogResource::Playlists, playlists, &mut report),
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded catalog refresh");
            report.superseded = true;
            return report;
        }

        info!(
            songs = snapshot.songs.len(),
            albums = snapshot.albums.len(),
            artists = snapshot.artists.len(),
            favorites = snapshot.favorites.len(),
            playlists = snapshot.playlists.len(),
            failures = report.failures.len(),
            "Catalog refreshed"
        );
        self.snapshot.send_replace(Arc::new(snapshot));
        report
    }
}

fn collect<T>(
    resource: CatalogResource,
    result: aria_core::Result<Vec<T>>,
    report: &mut RefreshReport,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(%resource, error = %e, "Catalog fetch failed, using empty collection");
            report.failures.push((resource, e));
            Vec::new()
        }
    }
}
