mod ids;

// Catalog records
mod album;
mod artist;
mod playlist;
mod song;

// Playable item
mod track;

pub use ids::{de_track_id_list, TrackId};

pub use album::Album;
pub use artist::Artist;
pub use playlist::Playlist;
pub use song::{parse_clock, Song};
pub use track::{Track, UNKNOWN_ARTIST};
