//! Main Aria backend client.

use crate::catalog::CatalogClient;
use crate::error::{Result, ServerClientError};
use crate::favorites::FavoritesClient;
use crate::plays::PlaysClient;
use crate::types::ServerConfig;
use aria_core::{Album, Artist, AriaError, MusicService, Playlist, Song, TrackId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;
use url::Url;

/// Client for the Aria REST backend.
///
/// The client itself holds no session: catalog listings are public and every
/// user-specific call takes the bearer token as an argument.
///
/// # Example
///
/// ```ignore
/// use aria_server_client::{AriaServerClient, ServerConfig};
///
/// let client = AriaServerClient::new(ServerConfig::new("https://music.example.com"))?;
///
/// let songs = client.catalog().songs().await?;
/// println!("Found {} songs", songs.len());
///
/// client.favorites(&token).add(&songs[0].id).await?;
/// ```
#[derive(Clone)]
pub struct AriaServerClient {
    http: Client,
    base_url: Url,
}

impl AriaServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/');
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url =
            Url::parse(url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("AriaPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the server URL (without trailing slash).
    pub fn url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Catalog listings.
    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient::new(&self.http, &self.base_url)
    }

    /// Favorite add/remove for the given session.
    pub fn favorites<'a>(&'a self, access_token: &'a str) -> FavoritesClient<'a> {
        FavoritesClient::new(&self.http, &self.base_url, access_token)
    }

    /// Play reporting for the given session.
    pub fn plays<'a>(&'a self, access_token: &'a str) -> PlaysClient<'a> {
        PlaysClient::new(&self.http, &self.base_url, access_token)
    }
}

/// Build `<base>/<segments...>`, percent-encoding each segment.
pub(crate) fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ServerClientError::InvalidUrl(format!("{} cannot be a base", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request, classifying connection failures.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ServerClientError::ServerUnreachable(e.to_string())
        } else {
            ServerClientError::Request(e)
        }
    })
}

/// Map a non-success status into an error, passing successful responses through.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 || status.as_u16() == 403 {
        debug!(status = status.as_u16(), url = %response.url(), "Token rejected");
        Err(ServerClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ServerClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

#[async_trait]
impl MusicService for AriaServerClient {
    async fn list_songs(&self) -> aria_core::Result<Vec<Song>> {
        Ok(self.catalog().songs().await?)
    }

    async fn list_albums(&self) -> aria_core::Result<Vec<Album>> {
        Ok(self.catalog().albums().await?)
    }

    async fn list_artists(&self) -> aria_core::Result<Vec<Artist>> {
        Ok(self.catalog().artists().await?)
    }

    async fn list_favorites(&self, access_token: &str) -> aria_core::Result<Vec<TrackId>> {
        Ok(self.favorites(access_token).list().await?)
    }

    async fn list_playlists(&self, access_token: &str) -> aria_core::Result<Vec<Playlist>> {
        Ok(self.catalog().playlists(access_token).await?)
    }

    async fn record_play(&self, access_token: &str, track_id: &TrackId) -> aria_core::Result<()> {
        self.plays(access_token)
            .record(track_id)
            .await
            .map_err(AriaError::from)
    }

    async fn add_favorite(&self, access_token: &str, track_id: &TrackId) -> aria_core::Result<()> {
        self.favorites(access_token)
            .add(track_id)
            .await
            .map_err(AriaError::from)
    }

    async fn remove_favorite(
        &self,
        access_token: &str,
        track_id: &TrackId,
    ) -> aria_core::Result<()> {
        self.favorites(access_token)
            .remove(track_id)
            .await
            .map_err(AriaError::from)
    }
}
