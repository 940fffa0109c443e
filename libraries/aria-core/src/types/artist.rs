//! Artist types

use serde::{Deserialize, Serialize};

/// An artist as listed by `GET /artist/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "image", alias = "imageUrl")]
    pub image_url: Option<String>,
}
