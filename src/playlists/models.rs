use crate::songs::SongSummary;
use rusqlite::Row;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// A playlist as listed to users, with the owner's username.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl PlaylistSummary {
    /// Maps an `(id, name, username)` row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(PlaylistSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            username: row.get(2)?,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlaylistWithSongs {
    pub id: String,
    pub name: String,
    pub username: String,
    pub songs: Vec<SongSummary>,
}

impl PlaylistWithSongs {
    pub fn new(summary: PlaylistSummary, songs: Vec<SongSummary>) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            username: summary.username,
            songs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityAction {
    Add,
    Delete,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Delete => "delete",
        }
    }
}

/// A new row for the append-only activity log.
#[derive(Clone, Debug)]
pub struct NewActivity<'a> {
    pub id: String,
    pub user_id: &'a str,
    pub action: ActivityAction,
    pub time: String,
}

/// An activity log entry joined with usernames and song titles. Either side
/// may be gone by the time the log is read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaylistActivity {
    pub username: Option<String>,
    pub title: Option<String>,
    pub action: String,
    pub time: String,
}

impl PlaylistActivity {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(PlaylistActivity {
            username: row.get(0)?,
            title: row.get(1)?,
            action: row.get(2)?,
            time: row.get(3)?,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistActivities {
    pub playlist_id: String,
    pub activities: Vec<PlaylistActivity>,
}
