use crate::catalog_db::CatalogDb;
use anyhow::Result;
use rusqlite::params;

pub trait AuthenticationStore: Send + Sync {
    fn add_refresh_token(&self, token: &str) -> Result<()>;

    fn refresh_token_exists(&self, token: &str) -> Result<bool>;

    /// Returns Ok(false) if the token was not stored.
    fn delete_refresh_token(&self, token: &str) -> Result<bool>;
}

pub struct SqliteAuthenticationStore {
    db: CatalogDb,
}

impl SqliteAuthenticationStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

impl AuthenticationStore for SqliteAuthenticationStore {
    fn add_refresh_token(&self, token: &str) -> Result<()> {
        let conn = self.db.write();
        conn.execute(
            "INSERT OR IGNORE INTO authentications (token) VALUES (?1)",
            params![token],
        )?;
        Ok(())
    }

    fn refresh_token_exists(&self, token: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM authentications WHERE token = ?1",
            params![token],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        let conn = self.db.write();
        let changed = conn.execute(
            "DELETE FROM authentications WHERE token = ?1",
            params![token],
        )?;
        Ok(changed > 0)
    }
}
