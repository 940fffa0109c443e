//! Types for Aria backend requests and responses.

use crate::error::{Result, ServerClientError};
use aria_core::TrackId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Configuration for connecting to the Aria backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl ServerConfig {
    /// Create a new server config with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// List Responses
// =============================================================================

/// Decode a list endpoint's body.
///
/// The backend answers either with a bare array or with an envelope such as
/// `{"success": true, "songs": [...]}`. The array is taken from `key`, then
/// from `data` (directly or one level down under `key`).
pub(crate) fn decode_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>> {
    let items = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            if let Some(items @ Value::Array(_)) = map.remove(key) {
                items
            } else {
                match map.remove("data") {
                    Some(items @ Value::Array(_)) => items,
                    Some(Value::Object(mut data)) => match data.remove(key) {
                        Some(items @ Value::Array(_)) => items,
                        _ => return Err(missing_list(key)),
                    },
                    _ => return Err(missing_list(key)),
                }
            }
        }
        other => {
            return Err(ServerClientError::ParseError(format!(
                "expected a list of {}, got {}",
                key,
                type_name(&other)
            )))
        }
    };

    serde_json::from_value(items)
        .map_err(|e| ServerClientError::ParseError(format!("Failed to parse {}: {}", key, e)))
}

fn missing_list(key: &str) -> ServerClientError {
    ServerClientError::ParseError(format!("response has no '{}' list", key))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// Reference to a song inside a favorite record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SongRef {
    Plain(String),
    Document {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

/// One entry of `GET /favorite/list`.
///
/// Depending on how the backend populates the query this is a bare song id,
/// a favorite document pointing at its song, or the song document itself.
/// Variant order matters: a favorite document has its own `_id`, so the
/// `song` field must be checked first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FavoriteEntry {
    Plain(String),
    Favorite {
        #[serde(alias = "songId", alias = "track")]
        song: SongRef,
    },
    Song {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl FavoriteEntry {
    pub(crate) fn into_track_id(self) -> TrackId {
        match self {
            FavoriteEntry::Plain(id)
            | FavoriteEntry::Song { id }
            | FavoriteEntry::Favorite {
                song: SongRef::Plain(id) | SongRef::Document { id },
            } => TrackId::new(id),
        }
    }
}
