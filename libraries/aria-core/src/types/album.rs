//! Album types

use super::ids::de_opt_id_ref;
use serde::{Deserialize, Serialize};

/// An album as listed by `GET /album/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(
        default,
        alias = "artist",
        alias = "artistId",
        deserialize_with = "de_opt_id_ref"
    )]
    pub artist_id: Option<String>,
    #[serde(default, alias = "image", alias = "imageUrl", alias = "cover")]
    pub image_url: Option<String>,
}
