//! Collaborator grants on playlists.

use crate::catalog_db::{generate_id, CatalogDb};
use crate::errors::{ServiceError, ServiceResult, FORBIDDEN_MESSAGE};
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

pub trait CollaborationStore: Send + Sync {
    /// Grants `user_id` access to `playlist_id` and returns the grant id.
    /// Returns Ok(None) if the grant already exists.
    fn add_collaboration(&self, id: &str, playlist_id: &str, user_id: &str)
        -> Result<Option<String>>;

    /// Returns Ok(false) if there was no such grant.
    fn delete_collaboration(&self, playlist_id: &str, user_id: &str) -> Result<bool>;

    fn is_collaborator(&self, playlist_id: &str, user_id: &str) -> Result<bool>;
}

pub struct SqliteCollaborationStore {
    db: CatalogDb,
}

impl SqliteCollaborationStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

impl CollaborationStore for SqliteCollaborationStore {
    fn add_collaboration(
        &self,
        id: &str,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<String>> {
        let conn = self.db.write();
        conn.query_row(
            "INSERT OR IGNORE INTO collaborations (id, playlist_id, user_id) VALUES (?1, ?2, ?3) RETURNING id",
            params![id, playlist_id, user_id],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| {
            format!(
                "Failed to add collaborator {} to playlist {}",
                user_id, playlist_id
            )
        })
    }

    fn delete_collaboration(&self, playlist_id: &str, user_id: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute(
            "DELETE FROM collaborations WHERE playlist_id = ?1 AND user_id = ?2",
            params![playlist_id, user_id],
        )?;
        Ok(changed > 0)
    }

    fn is_collaborator(&self, playlist_id: &str, user_id: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM collaborations WHERE playlist_id = ?1 AND user_id = ?2",
            params![playlist_id, user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

pub struct CollaborationsService {
    store: Arc<dyn CollaborationStore>,
}

impl CollaborationsService {
    pub fn new(store: Arc<dyn CollaborationStore>) -> Self {
        Self { store }
    }

    pub fn add_collaboration(&self, playlist_id: &str, user_id: &str) -> ServiceResult<String> {
        self.store
            .add_collaboration(&generate_id("collab"), playlist_id, user_id)?
            .ok_or_else(|| ServiceError::invariant("Kolaborasi gagal ditambahkan"))
    }

    pub fn delete_collaboration(&self, playlist_id: &str, user_id: &str) -> ServiceResult<()> {
        if !self.store.delete_collaboration(playlist_id, user_id)? {
            return Err(ServiceError::invariant("Kolaborasi gagal dihapus"));
        }
        Ok(())
    }

    pub fn verify_collaborator(&self, playlist_id: &str, user_id: &str) -> ServiceResult<()> {
        if !self.store.is_collaborator(playlist_id, user_id)? {
            return Err(ServiceError::Authorization(FORBIDDEN_MESSAGE.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_service() -> (CollaborationsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = CatalogDb::open(temp_dir.path().join("catalog.db")).unwrap();
        {
            let conn = db.write();
            for user in ["user-owner", "user-collab"] {
                conn.execute(
                    "INSERT INTO users (id, username, password, fullname) VALUES (?1, ?1, 'x', 'User')",
                    params![user],
                )
                .unwrap();
            }
            conn.execute(
                "INSERT INTO playlists (id, name, owner) VALUES ('playlist-1', 'P', 'user-owner')",
                [],
            )
            .unwrap();
        }
        (
            CollaborationsService::new(Arc::new(SqliteCollaborationStore::new(db))),
            temp_dir,
        )
    }

    #[test]
    fn grant_and_revoke() {
        let (service, _temp_dir) = create_service();

        assert!(matches!(
            service.verify_collaborator("playlist-1", "user-collab"),
            Err(ServiceError::Authorization(_))
        ));

        let id = service
            .add_collaboration("playlist-1", "user-collab")
            .unwrap();
        assert!(id.starts_with("collab-"));
        service
            .verify_collaborator("playlist-1", "user-collab")
            .unwrap();

        service
            .delete_collaboration("playlist-1", "user-collab")
            .unwrap();
        assert!(service
            .verify_collaborator("playlist-1", "user-collab")
            .is_err());
    }

    #[test]
    fn duplicate_grant_is_invariant_error() {
        let (service, _temp_dir) = create_service();
        service
            .add_collaboration("playlist-1", "user-collab")
            .unwrap();
        assert!(matches!(
            service.add_collaboration("playlist-1", "user-collab"),
            Err(ServiceError::Invariant(_))
        ));
    }

    #[test]
    fn deleting_absent_grant_fails() {
        let (service, _temp_dir) = create_service();
        assert!(matches!(
            service.delete_collaboration("playlist-1", "user-collab"),
            Err(ServiceError::Invariant(ref m)) if m == "Kolaborasi gagal dihapus"
        ));
    }
}
