/// Track domain type
use super::{Album, Artist, Song, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Artist name shown when neither the song nor the catalog names one
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A playable audio item
///
/// Built once from catalog data and never mutated afterwards; everything the
/// playback engine and the UI need is resolved eagerly so no catalog lookup
/// happens during playback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Identifier, shared with the source song
    pub id: TrackId,

    /// URL the playback engine streams from
    pub source_url: String,

    /// Track title
    pub title: String,

    /// Display artist
    pub artist_name: String,

    /// Cover art (song image, falling back to the album cover)
    pub artwork_url: Option<String>,

    /// Track duration (zero when unknown)
    pub duration: Duration,
}

impl Track {
    /// Resolve a song against the rest of the catalog
    ///
    /// The artist name comes from the song itself, then from the referenced
    /// artist record, then falls back to [`UNKNOWN_ARTIST`]. Artwork comes
    /// from the song image, then the referenced album's cover.
    pub fn from_song(song: &Song, artists: &[Artist], albums: &[Album]) -> Self {
        let album = song
            .album_id
            .as_deref()
            .and_then(|id| albums.iter().find(|a| a.id == id));

        let artist_name = song
            .artist_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                let artist_id = song
                    .artist_id
                    .as_deref()
                    .or_else(|| album.and_then(|a| a.artist_id.as_deref()))?;
                artists
                    .iter()
                    .find(|a| a.id == artist_id)
                    .map(|a| a.name.clone())
            })
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        let artwork_url = song
            .image_url
            .clone()
            .or_else(|| album.and_then(|a| a.image_url.clone()));

        Self {
            id: song.id.clone(),
            source_url: song.file_url.clone(),
            title: song.title.clone(),
            artist_name,
            artwork_url,
            duration: Duration::from_secs(u64::from(song.duration_seconds.unwrap_or(0))),
        }
    }

    /// Duration in whole seconds
    pub fn duration_seconds(&self) -> u64 {
        self.duration.as_secs()
    }
}
