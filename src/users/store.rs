use crate::catalog_db::CatalogDb;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user_id: String,
    pub password_hash: String,
}

pub trait UserStore: Send + Sync {
    /// Inserts a user and returns its id.
    /// Returns Ok(None) if the username is already taken.
    fn insert_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        fullname: &str,
    ) -> Result<Option<String>>;

    fn username_exists(&self, username: &str) -> Result<bool>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, id: &str) -> Result<Option<User>>;

    fn user_exists(&self, id: &str) -> Result<bool>;

    /// Returns Ok(None) if no user has the given username.
    fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;
}

pub struct SqliteUserStore {
    db: CatalogDb,
}

impl SqliteUserStore {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}

impl UserStore for SqliteUserStore {
    fn insert_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        fullname: &str,
    ) -> Result<Option<String>> {
        let conn = self.db.write();
        conn.query_row(
            "INSERT OR IGNORE INTO users (id, username, password, fullname) VALUES (?1, ?2, ?3, ?4) RETURNING id",
            params![id, username, password_hash, fullname],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to create user {}", username))
    }

    fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.db.read();
        let user = conn
            .query_row(
                "SELECT id, username, fullname FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        fullname: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn user_exists(&self, id: &str) -> Result<bool> {
        let conn = self.db.read();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let conn = self.db.read();
        let credentials = conn
            .query_row(
                "SELECT id, password FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserCredentials {
                        user_id: row.get(0)?,
                        password_hash: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }
}
