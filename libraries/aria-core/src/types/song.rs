//! Song catalog record

use super::ids::{de_opt_id_ref, TrackId};
use serde::{Deserialize, Deserializer, Serialize};

/// A song as listed by `GET /song/list`
///
/// Field names follow the backend's documents (`_id`, `name`, `file`,
/// `image`); camelCase and snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Document id
    #[serde(rename = "_id", alias = "id")]
    pub id: TrackId,

    /// Song title
    #[serde(alias = "name")]
    pub title: String,

    /// Denormalized artist name, when the backend provides it
    #[serde(default, alias = "artistName")]
    pub artist_name: Option<String>,

    /// Artist reference (id or populated document)
    #[serde(
        default,
        alias = "artist",
        alias = "artistId",
        deserialize_with = "de_opt_id_ref"
    )]
    pub artist_id: Option<String>,

    /// Album reference (id or populated document)
    #[serde(
        default,
        alias = "album",
        alias = "albumId",
        deserialize_with = "de_opt_id_ref"
    )]
    pub album_id: Option<String>,

    /// Streamable audio URL
    #[serde(alias = "file", alias = "url", alias = "audioUrl", alias = "fileUrl")]
    pub file_url: String,

    /// Cover image URL
    #[serde(default, alias = "image", alias = "imageUrl", alias = "artwork")]
    pub image_url: Option<String>,

    /// Duration in whole seconds
    #[serde(
        default,
        rename = "duration",
        deserialize_with = "de_duration_seconds"
    )]
    pub duration_seconds: Option<u32>,
}

/// Raw duration as stored by the backend: seconds or a clock string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(f64),
    Text(String),
}

fn de_duration_seconds<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDuration::Seconds(secs)) => seconds_from_f64(secs),
        Some(RawDuration::Text(text)) => parse_clock(&text),
        None => None,
    })
}

fn seconds_from_f64(secs: f64) -> Option<u32> {
    if secs.is_finite() && secs >= 0.0 && secs <= f64::from(u32::MAX) {
        Some(secs.round() as u32)
    } else {
        None
    }
}

/// Parse `"185"`, `"3:05"`, or `"1:02:03"` into seconds
pub fn parse_clock(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    if parts.len() == 1 {
        return text.parse::<f64>().ok().and_then(seconds_from_f64);
    }

    let mut total: u32 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u32 = part.trim().parse().ok()?;
        // minutes and seconds fields stay below 60 except the leading one
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}
