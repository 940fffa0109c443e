//! Aria Server Client
//!
//! HTTP client library for the Aria Player REST backend.
//!
//! # Features
//!
//! - **Catalog**: songs, albums, artists (public) and playlists (authenticated)
//! - **Favorites**: list, add, and remove favorite songs
//! - **Plays**: report that a song started playing
//!
//! [`AriaServerClient`] implements [`aria_core::MusicService`], so it can be
//! handed straight to the playback controller.
//!
//! # Example
//!
//! ```ignore
//! use aria_server_client::{AriaServerClient, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AriaServerClient::new(ServerConfig::new("https://music.example.com"))?;
//!
//!     let songs = client.catalog().songs().await?;
//!     println!("Found {} songs", songs.len());
//!
//!     let favorites = client.favorites("token").list().await?;
//!     println!("{} favorites", favorites.len());
//!
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod error;
mod favorites;
mod plays;
mod types;

// Re-export main types
pub use client::AriaServerClient;
pub use error::{Result, ServerClientError};
pub use types::ServerConfig;

// Re-export sub-clients for direct use if needed
pub use catalog::CatalogClient;
pub use favorites::FavoritesClient;
pub use plays::PlaysClient;
