use super::password::{hash_password, verify_password};
use super::store::{User, UserStore};
use crate::catalog_db::generate_id;
use crate::errors::{ServiceError, ServiceResult};
use crate::validation::UserPayload;
use std::sync::Arc;

pub const USER_NOT_FOUND: &str = "User tidak ditemukan";
pub const WRONG_CREDENTIALS: &str = "Kredensial yang Anda berikan salah";
pub const USERNAME_TAKEN: &str = "Gagal menambahkan user. Username sudah digunakan.";

pub struct UsersService {
    store: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn add_user(&self, payload: &UserPayload) -> ServiceResult<String> {
        if self.store.username_exists(&payload.username)? {
            return Err(ServiceError::invariant(USERNAME_TAKEN));
        }
        let password_hash = hash_password(&payload.password)?;
        let id = generate_id("user");
        // A concurrent registration can claim the username after the check above.
        self.store
            .insert_user(&id, &payload.username, &password_hash, &payload.fullname)?
            .ok_or_else(|| ServiceError::invariant(USERNAME_TAKEN))
    }

    pub fn get_user(&self, id: &str) -> ServiceResult<User> {
        self.store
            .get_user(id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub fn verify_user_exists(&self, id: &str) -> ServiceResult<()> {
        if !self.store.user_exists(id)? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }

    /// Returns the id of the user the credentials belong to.
    pub fn verify_user_credential(&self, username: &str, password: &str) -> ServiceResult<String> {
        let credentials = self
            .store
            .get_user_credentials(username)?
            .ok_or_else(|| ServiceError::Authentication(WRONG_CREDENTIALS.to_string()))?;
        if !verify_password(password, &credentials.password_hash)? {
            return Err(ServiceError::Authentication(WRONG_CREDENTIALS.to_string()));
        }
        Ok(credentials.user_id)
    }
}
