//! Favorite songs of the authenticated user.

use crate::client::{check_status, endpoint, send};
use crate::error::{Result, ServerClientError};
use crate::types::{decode_list, FavoriteEntry};
use aria_core::TrackId;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Favorites client for the Aria backend.
pub struct FavoritesClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
    access_token: &'a str,
}

impl<'a> FavoritesClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// `GET /favorite/list`, reduced to the favorited song ids.
    pub async fn list(&self) -> Result<Vec<TrackId>> {
        let url = endpoint(self.base_url, &["favorite", "list"])?;
        debug!(url = %url, "Fetching favorites");

        let request = self.http.get(url).bearer_auth(self.access_token);
        let response = check_status(send(request).await?).await?;
        let body: Value = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse favorites response: {}", e))
        })?;

        let entries: Vec<FavoriteEntry> = decode_list(body, "favorites")?;
        let ids: Vec<TrackId> = entries
            .into_iter()
            .map(FavoriteEntry::into_track_id)
            .collect();

        debug!(count = ids.len(), "Fetched favorites");
        Ok(ids)
    }

    /// `POST /favorite/song/:id`
    pub async fn add(&self, track_id: &TrackId) -> Result<()> {
        let url = endpoint(self.base_url, &["favorite", "song", track_id.as_str()])?;
        debug!(url = %url, track_id = %track_id, "Adding favorite");

        let request = self.http.post(url).bearer_auth(self.access_token);
        check_status(send(request).await?).await?;
        Ok(())
    }

    /// `DELETE /favorite/song/:id`
    ///
    /// A 404 means the song was not a favorite to begin with, which is the
    /// state the caller asked for.
    pub async fn remove(&self, track_id: &TrackId) -> Result<()> {
        let url = endpoint(self.base_url, &["favorite", "song", track_id.as_str()])?;
        debug!(url = %url, track_id = %track_id, "Removing favorite");

        let request = self.http.delete(url).bearer_auth(self.access_token);
        let response = send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(track_id = %track_id, "Favorite was already absent");
            return Ok(());
        }

        check_status(response).await?;
        Ok(())
    }
}
