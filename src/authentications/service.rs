use super::store::AuthenticationStore;
use super::tokens::TokenManager;
use crate::errors::{ServiceError, ServiceResult};
use crate::users::UsersService;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const INVALID_REFRESH_TOKEN: &str = "Refresh token tidak valid";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthenticationsService {
    store: Arc<dyn AuthenticationStore>,
    users: Arc<UsersService>,
    tokens: TokenManager,
}

impl AuthenticationsService {
    pub fn new(
        store: Arc<dyn AuthenticationStore>,
        users: Arc<UsersService>,
        tokens: TokenManager,
    ) -> Self {
        Self {
            store,
            users,
            tokens,
        }
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn login(&self, username: &str, password: &str) -> ServiceResult<TokenPair> {
        let user_id = self.users.verify_user_credential(username, password)?;
        let access_token = self.tokens.generate_access_token(&user_id)?;
        let refresh_token = self.tokens.generate_refresh_token(&user_id)?;
        self.store.add_refresh_token(&refresh_token)?;
        debug!("Issued tokens for user {}", user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Issues a new access token for a stored, well-signed refresh token.
    pub fn refresh(&self, refresh_token: &str) -> ServiceResult<String> {
        self.verify_refresh_token_stored(refresh_token)?;
        let user_id = self
            .tokens
            .verify_refresh_token(refresh_token)
            .ok_or_else(|| ServiceError::invariant(INVALID_REFRESH_TOKEN))?;
        Ok(self.tokens.generate_access_token(&user_id)?)
    }

    pub fn logout(&self, refresh_token: &str) -> ServiceResult<()> {
        self.verify_refresh_token_stored(refresh_token)?;
        self.store.delete_refresh_token(refresh_token)?;
        Ok(())
    }

    fn verify_refresh_token_stored(&self, refresh_token: &str) -> ServiceResult<()> {
        if !self.store.refresh_token_exists(refresh_token)? {
            return Err(ServiceError::invariant(INVALID_REFRESH_TOKEN));
        }
        Ok(())
    }
}
