//! The catalog database handle shared by every store.

mod schema;

pub use schema::{CATALOG_VERSIONED_SCHEMAS, OLD_ALBUMS_ID};

use crate::sqlite_persistence::create_or_migrate;
use anyhow::{Context, Result};
use rand::{distr::Alphanumeric, rng, Rng};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const DEFAULT_READ_POOL_SIZE: usize = 4;

/// A random A-z0-9 string
pub fn random_string(len: usize) -> String {
    let bytes = rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .collect::<Vec<u8>>();
    String::from_utf8_lossy(&bytes).to_string()
}

/// Builds an entity id such as `albums-Xq3v...`, 16 random characters after the prefix.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, random_string(16))
}

/// One writer connection plus a round-robin pool of read-only connections,
/// opened once at startup and cloned into every store.
#[derive(Clone)]
pub struct CatalogDb {
    write_conn: Arc<Mutex<Connection>>,
    read_pool: Arc<Vec<Mutex<Connection>>>,
    read_index: Arc<AtomicUsize>,
}

impl CatalogDb {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::open_with_pool_size(db_path, DEFAULT_READ_POOL_SIZE)
    }

    pub fn open_with_pool_size<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;

        let version = create_or_migrate(&write_conn, CATALOG_VERSIONED_SCHEMAS)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        ensure_old_albums(&write_conn)?;

        let album_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))
            .unwrap_or(0);
        let song_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap_or(0);
        info!(
            "Opened catalog db v{}: {} albums, {} songs",
            version, album_count, song_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Mutex::new(read_conn));
        }

        Ok(CatalogDb {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool: Arc::new(read_pool),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn write(&self) -> MutexGuard<'_, Connection> {
        self.write_conn.lock().unwrap()
    }

    pub fn read(&self) -> MutexGuard<'_, Connection> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].lock().unwrap()
    }
}

fn ensure_old_albums(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO albums (id, name, year) VALUES (?1, 'old albums', 1900)",
        [OLD_ALBUMS_ID],
    )?;
    Ok(())
}
