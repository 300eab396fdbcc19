use crate::songs::SongSummary;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: i64,
    pub cover: Option<String>,
}

/// Album as returned by `GET /albums/{id}`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub year: i64,
    pub cover_url: Option<String>,
    pub songs: Vec<SongSummary>,
}

impl AlbumDetail {
    pub fn new(album: Album, songs: Vec<SongSummary>) -> Self {
        Self {
            id: album.id,
            name: album.name,
            year: album.year,
            cover_url: album.cover,
            songs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LikeCount {
    pub likes: i64,
    /// True when the count was served from the cache instead of the store.
    pub from_cache: bool,
}
