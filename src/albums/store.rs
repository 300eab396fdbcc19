use super::models::Album;
use crate::catalog_db::CatalogDb;
use crate::songs::SongSummary;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

pub trait AlbumStore: Send + Sync {
    /// Inserts a new album and returns its id.
    /// Returns Ok(None) if no row was written.
    fn insert_album(&self, id: &str, name: &str, year: i64) -> Result<Option<String>>;

    /// Returns Ok(None) if the album does not exist.
    fn get_album(&self, id: &str) -> Result<Option<Album>>;

    fn album_exists(&self, id: &str) -> Result<bool>;

    fn get_album_songs(&self, album_id: &str) -> Result<Vec<SongSummary>>;

    /// Returns Ok(false) if the album does not exist.
    fn update_album(&self, id: &str, name: &str, year: i64) -> Result<bool>;

    /// Returns Ok(false) if the album does not exist.
    fn delete_album(&self, id: &str) -> Result<bool>;

    /// Returns Ok(false) if the album does not exist.
    fn set_album_cover(&self, id: &str, cover_url: &str) -> Result<bool>;

    /// Removes the user's like if present, records one under `like_id` otherwise.
    /// Returns whether the album is liked afterwards.
    fn toggle_album_like(&self, like_id: &str, user_id: &str, album_id: &str) -> Result<bool>;

    fn count_album_likes(&self, album_id: &str) -> Result<i64>;
}

pub struct SqliteAlbumStore {
    db: CatalogDb,
}

impl SqliteAlbumStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

impl AlbumStore for SqliteAlbumStore {
    fn insert_album(&self, id: &str, name: &str, year: i64) -> Result<Option<String>> {
        let conn = self.db.write();
        conn.query_row(
            "INSERT INTO albums (id, name, year) VALUES (?1, ?2, ?3) RETURNING id",
            params![id, name, year],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to insert album {}", id))
    }

    fn get_album(&self, id: &str) -> Result<Option<Album>> {
        let conn = self.db.read();
        let album = conn
            .query_row(
                "SELECT id, name, year, cover FROM albums WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Album {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        year: row.get(2)?,
                        cover: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(album)
    }

    fn album_exists(&self, id: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM albums WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_album_songs(&self, album_id: &str) -> Result<Vec<SongSummary>> {
        let conn = self.db.read();
        let mut stmt = conn.prepare(
            "SELECT id, title, performer FROM songs WHERE album_id = ?1 ORDER BY created, id",
        )?;
        let songs = stmt
            .query_map(params![album_id], SongSummary::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn update_album(&self, id: &str, name: &str, year: i64) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute(
            "UPDATE albums SET name = ?1, year = ?2 WHERE id = ?3",
            params![name, year, id],
        )?;
        Ok(changed > 0)
    }

    fn delete_album(&self, id: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute("DELETE FROM albums WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn set_album_cover(&self, id: &str, cover_url: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute(
            "UPDATE albums SET cover = ?1 WHERE id = ?2",
            params![cover_url, id],
        )?;
        Ok(changed > 0)
    }

    fn toggle_album_like(&self, like_id: &str, user_id: &str, album_id: &str) -> Result<bool> {
        let mut conn = self.db.write();
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM user_album_likes WHERE user_id = ?1 AND album_id = ?2",
            params![user_id, album_id],
        )?;
        if removed == 0 {
            tx.execute(
                "INSERT OR IGNORE INTO user_album_likes (id, user_id, album_id) VALUES (?1, ?2, ?3)",
                params![like_id, user_id, album_id],
            )
            .with_context(|| format!("Failed to like album {} for user {}", album_id, user_id))?;
        }
        tx.commit()?;
        Ok(removed == 0)
    }

    fn count_album_likes(&self, album_id: &str) -> Result<i64> {
        let conn = self.db.read();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM user_album_likes WHERE album_id = ?1",
            params![album_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
