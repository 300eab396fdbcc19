mod models;
mod service;
mod store;

pub use models::{Song, SongFilter, SongRecord, SongSummary};
pub use service::{SongsService, SONG_NOT_FOUND};
pub use store::{SongStore, SqliteSongStore};
