/// Playlist domain types
use super::ids::{de_track_id_list, TrackId};
use serde::{Deserialize, Serialize};

/// A user playlist as listed by `GET /playlist/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Playlist name
    #[serde(alias = "title")]
    pub name: String,

    /// Songs in playlist order (ids or populated song documents)
    #[serde(
        default,
        rename = "songs",
        alias = "songIds",
        alias = "tracks",
        deserialize_with = "de_track_id_list"
    )]
    pub song_ids: Vec<TrackId>,
}

impl Playlist {
    /// Number of songs in the playlist
    pub fn len(&self) -> usize {
        self.song_ids.len()
    }

    /// Whether the playlist has no songs
    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }

    /// Whether the playlist contains the given song
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.song_ids.contains(track_id)
    }
}
