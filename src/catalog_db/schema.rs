//! Catalog database schema.
//!
//! Version 0 is the first layout of the catalog, where songs were free to
//! reference no album at all. Version 1 moves every orphan song under the
//! `old_albums` sentinel album and turns `songs.album_id` into a cascading
//! foreign key.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::Result;
use rusqlite::Connection;

/// Album every song without an explicit album belongs to.
pub const OLD_ALBUMS_ID: &str = "old_albums";

const ALBUMS_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const USERS_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const PLAYLISTS_FK: ForeignKey = ForeignKey {
    foreign_table: "playlists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SONGS_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

pub const ALBUMS_TABLE_V_0: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("cover", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const SONGS_TABLE_V_0: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("genre", &SqlType::Text, non_null = true),
        sqlite_column!("performer", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("album_id", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const SONGS_TABLE_V_1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("genre", &SqlType::Text, non_null = true),
        sqlite_column!("performer", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ALBUMS_FK)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_songs_album_id", "album_id")],
    unique_constraints: &[],
};

pub const USERS_TABLE_V_0: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("password", &SqlType::Text, non_null = true),
        sqlite_column!("fullname", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const AUTHENTICATIONS_TABLE_V_0: Table = Table {
    name: "authentications",
    columns: &[
        sqlite_column!("token", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const PLAYLISTS_TABLE_V_0: Table = Table {
    name: "playlists",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "owner",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USERS_FK)
        ),
    ],
    indices: &[("idx_playlists_owner", "owner")],
    unique_constraints: &[],
};

pub const PLAYLIST_SONGS_TABLE_V_0: Table = Table {
    name: "playlist_songs",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "playlist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&PLAYLISTS_FK)
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&SONGS_FK)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["playlist_id", "song_id"]],
};

pub const PLAYLIST_SONG_ACTIVITIES_TABLE_V_0: Table = Table {
    name: "playlist_song_activities",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "playlist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&PLAYLISTS_FK)
        ),
        sqlite_column!("song_id", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Text, non_null = true),
        sqlite_column!("action", &SqlType::Text, non_null = true),
        sqlite_column!("time", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_activities_playlist_id", "playlist_id")],
    unique_constraints: &[],
};

pub const COLLABORATIONS_TABLE_V_0: Table = Table {
    name: "collaborations",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "playlist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&PLAYLISTS_FK)
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USERS_FK)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["playlist_id", "user_id"]],
};

pub const USER_ALBUM_LIKES_TABLE_V_0: Table = Table {
    name: "user_album_likes",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USERS_FK)
        ),
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ALBUMS_FK)
        ),
    ],
    indices: &[("idx_album_likes_album_id", "album_id")],
    unique_constraints: &[&["user_id", "album_id"]],
};

fn migrate_to_v1(conn: &Connection) -> Result<()> {
    // Table rebuild: SQLite can't add a foreign key to an existing column.
    conn.execute_batch("PRAGMA foreign_keys = OFF; PRAGMA legacy_alter_table = ON;")?;
    conn.execute(
        "INSERT OR IGNORE INTO albums (id, name, year) VALUES (?1, 'old albums', 1900)",
        [OLD_ALBUMS_ID],
    )?;
    conn.execute(
        "UPDATE songs SET album_id = ?1 WHERE album_id IS NULL OR album_id NOT IN (SELECT id FROM albums)",
        [OLD_ALBUMS_ID],
    )?;
    conn.execute("ALTER TABLE songs RENAME TO songs_old", [])?;
    SONGS_TABLE_V_1.create(conn)?;
    conn.execute(
        "INSERT INTO songs (id, title, year, genre, performer, duration, album_id, created)
         SELECT id, title, year, genre, performer, duration, album_id, created FROM songs_old",
        [],
    )?;
    conn.execute("DROP TABLE songs_old", [])?;
    conn.execute_batch("PRAGMA legacy_alter_table = OFF; PRAGMA foreign_keys = ON;")?;
    Ok(())
}

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[
            ALBUMS_TABLE_V_0,
            SONGS_TABLE_V_0,
            USERS_TABLE_V_0,
            AUTHENTICATIONS_TABLE_V_0,
            PLAYLISTS_TABLE_V_0,
            PLAYLIST_SONGS_TABLE_V_0,
            PLAYLIST_SONG_ACTIVITIES_TABLE_V_0,
            COLLABORATIONS_TABLE_V_0,
            USER_ALBUM_LIKES_TABLE_V_0,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[
            ALBUMS_TABLE_V_0,
            SONGS_TABLE_V_1,
            USERS_TABLE_V_0,
            AUTHENTICATIONS_TABLE_V_0,
            PLAYLISTS_TABLE_V_0,
            PLAYLIST_SONGS_TABLE_V_0,
            PLAYLIST_SONG_ACTIVITIES_TABLE_V_0,
            COLLABORATIONS_TABLE_V_0,
            USER_ALBUM_LIKES_TABLE_V_0,
        ],
        migration: Some(migrate_to_v1),
    },
];
