//! Play history reporting.

use crate::client::{check_status, endpoint, send};
use crate::error::Result;
use aria_core::TrackId;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Play reporting client for the Aria backend.
pub struct PlaysClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
    access_token: &'a str,
}

impl<'a> PlaysClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// `POST /song/play/:id`
    pub async fn record(&self, track_id: &TrackId) -> Result<()> {
        let url = endpoint(self.base_url, &["song", "play", track_id.as_str()])?;
        debug!(url = %url, track_id = %track_id, "Recording play");

        let request = self.http.post(url).bearer_auth(self.access_token);
        check_status(send(request).await?).await?;
        Ok(())
    }
}
