//! Catalog listings: songs, albums, artists, and the user's playlists.

use crate::client::{check_status, endpoint, send};
use crate::error::{Result, ServerClientError};
use crate::types::decode_list;
use aria_core::{Album, Artist, Playlist, Song};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Catalog client for the Aria backend.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url) -> Self {
        Self { http, base_url }
    }

    /// `GET /song/list`
    pub async fn songs(&self) -> Result<Vec<Song>> {
        self.list("song", "songs", None).await
    }

    /// `GET /album/list`
    pub async fn albums(&self) -> Result<Vec<Album>> {
        self.list("album", "albums", None).await
    }

    /// `GET /artist/list`
    pub async fn artists(&self) -> Result<Vec<Artist>> {
        self.list("artist", "artists", None).await
    }

    /// `GET /playlist/list` (authenticated)
    pub async fn playlists(&self, access_token: &str) -> Result<Vec<Playlist>> {
        self.list("playlist", "playlists", Some(access_token)).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        key: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<T>> {
        let url = endpoint(self.base_url, &[resource, "list"])?;
        debug!(url = %url, resource, "Fetching catalog list");

        let mut request = self.http.get(url);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = check_status(send(request).await?).await?;
        let body: Value = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse {} response: {}", resource, e))
        })?;

        let items: Vec<T> = decode_list(body, key)?;
        debug!(resource, count = items.len(), "Fetched catalog list");

        Ok(items)
    }
}
