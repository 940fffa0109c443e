/// Core traits for Aria Player
use crate::error::Result;
use crate::types::{Album, Artist, Playlist, Song, TrackId};
use async_trait::async_trait;

/// Backend boundary for catalog, favorites, and play history
///
/// The playback controller only talks to the backend through this trait so
/// tests and alternative transports can be injected. Catalog listings are
/// public; everything user-specific takes the session's bearer token
/// explicitly rather than relying on hidden client state.
#[async_trait]
pub trait MusicService: Send + Sync {
    /// List every song in the catalog (`GET /song/list`)
    ///
    /// # Errors
    /// Returns an error if the request fails or the body cannot be decoded
    async fn list_songs(&self) -> Result<Vec<Song>>;

    /// List every album (`GET /album/list`)
    ///
    /// # Errors
    /// Returns an error if the request fails or the body cannot be decoded
    async fn list_albums(&self) -> Result<Vec<Album>>;

    /// List every artist (`GET /artist/list`)
    ///
    /// # Errors
    /// Returns an error if the request fails or the body cannot be decoded
    async fn list_artists(&self) -> Result<Vec<Artist>>;

    /// List the ids of the user's favorite songs (`GET /favorite/list`)
    ///
    /// # Errors
    /// Returns `AriaError::AuthRequired` if the token is rejected
    async fn list_favorites(&self, access_token: &str) -> Result<Vec<TrackId>>;

    /// List the user's playlists (`GET /playlist/list`)
    ///
    /// # Errors
    /// Returns `AriaError::AuthRequired` if the token is rejected
    async fn list_playlists(&self, access_token: &str) -> Result<Vec<Playlist>>;

    /// Record that a track started playing (`POST /song/play/:id`)
    ///
    /// # Errors
    /// Returns an error if the request fails
    async fn record_play(&self, access_token: &str, track_id: &TrackId) -> Result<()>;

    /// Add a song to the user's favorites (`POST /favorite/song/:id`)
    ///
    /// # Errors
    /// Returns an error if the request fails
    async fn add_favorite(&self, access_token: &str, track_id: &TrackId) -> Result<()>;

    /// Remove a song from the user's favorites (`DELETE /favorite/song/:id`)
    ///
    /// # Errors
    /// Returns an error if the request fails
    async fn remove_favorite(&self, access_token: &str, track_id: &TrackId) -> Result<()>;
}
