//! Playlists, their songs and the activity log.

mod models;
mod service;
mod store;

pub use models::{
    ActivityAction, NewActivity, Playlist, PlaylistActivities, PlaylistActivity, PlaylistSummary,
    PlaylistWithSongs,
};
pub use service::{PlaylistsService, PLAYLIST_NOT_FOUND};
pub use store::{PlaylistStore, SqlitePlaylistStore};
