/// ID types for Aria Player entities
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Track identifier
///
/// The backend's document id of a song. A playable `Track` shares the id of
/// the song it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A reference to another document: either its bare id or the populated
/// document itself (only `_id` is read from it).
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRef {
    Plain(String),
    Document {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl IdRef {
    fn into_id(self) -> String {
        match self {
            IdRef::Plain(id) | IdRef::Document { id } => id,
        }
    }
}

/// Deserialize an optional reference that may be an id string or a populated document
pub(crate) fn de_opt_id_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRef>::deserialize(deserializer)?.map(IdRef::into_id))
}

/// Deserialize a list of references into track ids
///
/// Accepts `["id", ...]`, `[{"_id": "id", ...}, ...]`, or a mix of both.
pub fn de_track_id_list<'de, D>(deserializer: D) -> Result<Vec<TrackId>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<IdRef>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(refs
        .into_iter()
        .map(|r| TrackId::new(r.into_id()))
        .collect())
}
