mod models;
mod service;
mod store;

pub use models::{Album, AlbumDetail, LikeCount};
pub use service::{AlbumsService, ALBUM_NOT_FOUND};
pub use store::{AlbumStore, SqliteAlbumStore};
