use super::models::{NewActivity, Playlist, PlaylistActivity, PlaylistSummary};
use crate::catalog_db::CatalogDb;
use crate::songs::SongSummary;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

pub trait PlaylistStore: Send + Sync {
    /// Returns Ok(None) if no row was written.
    fn insert_playlist(&self, id: &str, name: &str, owner: &str) -> Result<Option<String>>;

    /// Returns Ok(None) if the playlist does not exist.
    fn get_playlist(&self, id: &str) -> Result<Option<Playlist>>;

    /// Returns Ok(None) if the playlist does not exist.
    fn get_playlist_summary(&self, id: &str) -> Result<Option<PlaylistSummary>>;

    /// Playlists the user owns or collaborates on.
    fn get_playlists_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>>;

    /// Returns Ok(false) if the playlist does not exist.
    fn delete_playlist(&self, id: &str) -> Result<bool>;

    /// Adds a song and logs the activity in one transaction.
    /// Returns Ok(false) if the song is already in the playlist.
    fn add_playlist_song(
        &self,
        entry_id: &str,
        playlist_id: &str,
        song_id: &str,
        activity: &NewActivity,
    ) -> Result<bool>;

    fn get_playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>>;

    /// Removes a song and logs the activity in one transaction.
    /// Returns Ok(false) if the song was not in the playlist.
    fn delete_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        activity: &NewActivity,
    ) -> Result<bool>;

    /// Activity log of a playlist, oldest first.
    fn get_activities(&self, playlist_id: &str) -> Result<Vec<PlaylistActivity>>;
}

pub struct SqlitePlaylistStore {
    db: CatalogDb,
}

impl SqlitePlaylistStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

fn insert_activity(
    conn: &rusqlite::Connection,
    playlist_id: &str,
    song_id: &str,
    activity: &NewActivity,
) -> Result<()> {
    conn.execute(
        "INSERT INTO playlist_song_activities (id, playlist_id, song_id, user_id, action, time) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            activity.id,
            playlist_id,
            song_id,
            activity.user_id,
            activity.action.as_str(),
            activity.time
        ],
    )
    .with_context(|| format!("Failed to log activity on playlist {}", playlist_id))?;
    Ok(())
}

impl PlaylistStore for SqlitePlaylistStore {
    fn insert_playlist(&self, id: &str, name: &str, owner: &str) -> Result<Option<String>> {
        let conn = self.db.write();
        conn.query_row(
            "INSERT INTO playlists (id, name, owner) VALUES (?1, ?2, ?3) RETURNING id",
            params![id, name, owner],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to insert playlist {}", id))
    }

    fn get_playlist(&self, id: &str) -> Result<Option<Playlist>> {
        let conn = self.db.read();
        let playlist = conn
            .query_row(
                "SELECT id, name, owner FROM playlists WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Playlist {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        owner: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(playlist)
    }

    fn get_playlist_summary(&self, id: &str) -> Result<Option<PlaylistSummary>> {
        let conn = self.db.read();
        let summary = conn
            .query_row(
                "SELECT playlists.id, playlists.name, users.username FROM playlists \
                 JOIN users ON users.id = playlists.owner \
                 WHERE playlists.id = ?1",
                params![id],
                PlaylistSummary::from_row,
            )
            .optional()?;
        Ok(summary)
    }

    fn get_playlists_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>> {
        let conn = self.db.read();
        let mut stmt = conn.prepare(
            "SELECT playlists.id, playlists.name, users.username FROM playlists \
             JOIN users ON users.id = playlists.owner \
             WHERE playlists.owner = ?1 \
             OR playlists.id IN (SELECT playlist_id FROM collaborations WHERE user_id = ?1) \
             ORDER BY playlists.rowid",
        )?;
        let playlists = stmt
            .query_map(params![user_id], PlaylistSummary::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(playlists)
    }

    fn delete_playlist(&self, id: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute("DELETE FROM playlists WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn add_playlist_song(
        &self,
        entry_id: &str,
        playlist_id: &str,
        song_id: &str,
        activity: &NewActivity,
    ) -> Result<bool> {
        let mut conn = self.db.write();
        let tx = conn.transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO playlist_songs (id, playlist_id, song_id) VALUES (?1, ?2, ?3)",
            params![entry_id, playlist_id, song_id],
        )?;
        if inserted == 0 {
            return Ok(false);
        }
        insert_activity(&tx, playlist_id, song_id, activity)?;
        tx.commit()?;
        Ok(true)
    }

    fn get_playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>> {
        let conn = self.db.read();
        let mut stmt = conn.prepare(
            "SELECT songs.id, songs.title, songs.performer FROM playlist_songs \
             JOIN songs ON songs.id = playlist_songs.song_id \
             WHERE playlist_songs.playlist_id = ?1 \
             ORDER BY playlist_songs.rowid",
        )?;
        let songs = stmt
            .query_map(params![playlist_id], SongSummary::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn delete_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        activity: &NewActivity,
    ) -> Result<bool> {
        let mut conn = self.db.write();
        let tx = conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM playlist_songs WHERE playlist_id = ?1 AND song_id = ?2",
            params![playlist_id, song_id],
        )?;
        if deleted == 0 {
            return Ok(false);
        }
        insert_activity(&tx, playlist_id, song_id, activity)?;
        tx.commit()?;
        Ok(true)
    }

    fn get_activities(&self, playlist_id: &str) -> Result<Vec<PlaylistActivity>> {
        let conn = self.db.read();
        let mut stmt = conn.prepare(
            "SELECT users.username, songs.title, activities.action, activities.time \
             FROM playlist_song_activities AS activities \
             LEFT JOIN users ON users.id = activities.user_id \
             LEFT JOIN songs ON songs.id = activities.song_id \
             WHERE activities.playlist_id = ?1 \
             ORDER BY activities.time, activities.rowid",
        )?;
        let activities = stmt
            .query_map(params![playlist_id], PlaylistActivity::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }
}
