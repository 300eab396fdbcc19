use rusqlite::Row;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub year: i64,
    pub genre: String,
    pub performer: String,
    pub duration: Option<i64>,
    pub album_id: String,
}

impl Song {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Song {
            id: row.get(0)?,
            title: row.get(1)?,
            year: row.get(2)?,
            genre: row.get(3)?,
            performer: row.get(4)?,
            duration: row.get(5)?,
            album_id: row.get(6)?,
        })
    }
}

/// The short form songs take inside album, playlist and search listings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub performer: String,
}

impl SongSummary {
    /// Maps a `(id, title, performer)` row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SongSummary {
            id: row.get(0)?,
            title: row.get(1)?,
            performer: row.get(2)?,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct SongFilter {
    pub title: Option<String>,
    pub performer: Option<String>,
}

/// Fields written by song inserts and updates.
#[derive(Clone, Debug)]
pub struct SongRecord<'a> {
    pub title: &'a str,
    pub year: i64,
    pub genre: &'a str,
    pub performer: &'a str,
    pub duration: Option<i64>,
    pub album_id: &'a str,
}
