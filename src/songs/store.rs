use super::models::{Song, SongFilter, SongRecord, SongSummary};
use crate::catalog_db::CatalogDb;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

pub trait SongStore: Send + Sync {
    /// Inserts a song and returns its id.
    /// Returns Ok(None) if no row was written.
    fn insert_song(&self, id: &str, song: &SongRecord) -> Result<Option<String>>;

    /// Lists songs whose title and performer contain the given filters,
    /// ignoring case.
    fn get_songs(&self, filter: &SongFilter) -> Result<Vec<SongSummary>>;

    /// Returns Ok(None) if the song does not exist.
    fn get_song(&self, id: &str) -> Result<Option<Song>>;

    fn song_exists(&self, id: &str) -> Result<bool>;

    /// Returns Ok(false) if the song does not exist.
    fn update_song(&self, id: &str, song: &SongRecord) -> Result<bool>;

    /// Returns Ok(false) if the song does not exist.
    fn delete_song(&self, id: &str) -> Result<bool>;
}

pub struct SqliteSongStore {
    db: CatalogDb,
}

impl SqliteSongStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

fn like_pattern(value: &Option<String>) -> String {
    let escaped = value
        .as_deref()
        .unwrap_or_default()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl SongStore for SqliteSongStore {
    fn insert_song(&self, id: &str, song: &SongRecord) -> Result<Option<String>> {
        let conn = self.db.write();
        conn.query_row(
            "INSERT INTO songs (id, title, year, genre, performer, duration, album_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
            params![
                id,
                song.title,
                song.year,
                song.genre,
                song.performer,
                song.duration,
                song.album_id
            ],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to insert song {}", id))
    }

    fn get_songs(&self, filter: &SongFilter) -> Result<Vec<SongSummary>> {
        let conn = self.db.read();
        // SQLite's LIKE is already case-insensitive for ASCII.
        let mut stmt = conn.prepare(
            "SELECT id, title, performer FROM songs
             WHERE title LIKE ?1 ESCAPE '\\' AND performer LIKE ?2 ESCAPE '\\'
             ORDER BY created, id",
        )?;
        let songs = stmt
            .query_map(
                params![like_pattern(&filter.title), like_pattern(&filter.performer)],
                SongSummary::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn get_song(&self, id: &str) -> Result<Option<Song>> {
        let conn = self.db.read();
        let song = conn
            .query_row(
                "SELECT id, title, year, genre, performer, duration, album_id FROM songs WHERE id = ?1",
                params![id],
                Song::from_row,
            )
            .optional()?;
        Ok(song)
    }

    fn song_exists(&self, id: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM songs WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn update_song(&self, id: &str, song: &SongRecord) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute(
            "UPDATE songs SET title = ?1, year = ?2, genre = ?3, performer = ?4, duration = ?5, album_id = ?6
             WHERE id = ?7",
            params![
                song.title,
                song.year,
                song.genre,
                song.performer,
                song.duration,
                song.album_id,
                id
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_song(&self, id: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
