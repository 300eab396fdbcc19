//! Durable outbox the export worker drains.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    create_or_migrate, Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub trait MessageProducer: Send + Sync {
    fn send_message(&self, queue: &str, message: &str) -> Result<()>;
}

const QUEUED_MESSAGES_TABLE_V_0: Table = Table {
    name: "queued_messages",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("queue", &SqlType::Text, non_null = true),
        sqlite_column!("message", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_queued_messages_queue", "queue")],
    unique_constraints: &[],
};

const QUEUE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[QUEUED_MESSAGES_TABLE_V_0],
    migration: None,
}];

#[derive(Clone, Debug, PartialEq)]
pub struct QueuedMessage {
    pub id: i64,
    pub queue: String,
    pub message: String,
}

#[derive(Clone)]
pub struct SqliteMessageQueue {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMessageQueue {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open queue database {:?}", db_path))?;
        let version = create_or_migrate(&conn, QUEUE_VERSIONED_SCHEMAS)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        info!("Opened queue db v{} at {:?}", version, db_path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Messages waiting on `queue`, oldest first.
    pub fn pending(&self, queue: &str) -> Result<Vec<QueuedMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, queue, message FROM queued_messages WHERE queue = ?1 ORDER BY id",
        )?;
        let messages = stmt
            .query_map(params![queue], |row| {
                Ok(QueuedMessage {
                    id: row.get(0)?,
                    queue: row.get(1)?,
                    message: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    /// Removes a message once the consumer is done with it.
    pub fn acknowledge(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM queued_messages WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl MessageProducer for SqliteMessageQueue {
    fn send_message(&self, queue: &str, message: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO queued_messages (queue, message) VALUES (?1, ?2)",
            params![queue, message],
        )
        .with_context(|| format!("Failed to enqueue message on {}", queue))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn messages_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("queue.db");

        {
            let queue = SqliteMessageQueue::open(&path).unwrap();
            queue.send_message("export:playlists", "first").unwrap();
            queue.send_message("other", "ignored").unwrap();
            queue.send_message("export:playlists", "second").unwrap();
        }

        let queue = SqliteMessageQueue::open(&path).unwrap();
        let pending = queue.pending("export:playlists").unwrap();
        let bodies: Vec<&str> = pending.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);

        assert!(queue.acknowledge(pending[0].id).unwrap());
        assert!(!queue.acknowledge(pending[0].id).unwrap());
        assert_eq!(queue.pending("export:playlists").unwrap().len(), 1);
    }
}
