//! HS256 access and refresh tokens carrying the user id.

use crate::catalog_db::random_string;
use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: String,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

#[derive(Clone)]
pub struct TokenManager {
    access_key: String,
    refresh_key: String,
    access_token_age_sec: u64,
}

impl TokenManager {
    pub fn new(access_key: &str, refresh_key: &str, access_token_age_sec: u64) -> Self {
        Self {
            access_key: access_key.to_string(),
            refresh_key: refresh_key.to_string(),
            access_token_age_sec,
        }
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now,
            exp: Some(now + self.access_token_age_sec as i64),
            jti: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_key.as_bytes()),
        )
        .context("Failed to sign access token")
    }

    /// Refresh tokens don't expire; they stay valid until deleted from the store.
    /// Each carries a random `jti` so two logins never share a token.
    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String> {
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: None,
            jti: Some(random_string(16)),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_key.as_bytes()),
        )
        .context("Failed to sign refresh token")
    }

    /// Returns the user id of a well-signed, unexpired access token.
    pub fn verify_access_token(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.access_key.as_bytes()),
            &validation,
        )
        .ok()
        .map(|data| data.claims.user_id)
    }

    /// Returns the user id of a well-signed refresh token.
    pub fn verify_refresh_token(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.refresh_key.as_bytes()),
            &validation,
        )
        .ok()
        .map(|data| data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(age: u64) -> TokenManager {
        TokenManager::new("access-secret", "refresh-secret", age)
    }

    #[test]
    fn access_token_round_trip() {
        let tokens = manager(1800);
        let token = tokens.generate_access_token("user-1").unwrap();
        assert_eq!(tokens.verify_access_token(&token).as_deref(), Some("user-1"));
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        let tokens = manager(1800);
        let access = tokens.generate_access_token("user-1").unwrap();
        let refresh = tokens.generate_refresh_token("user-1").unwrap();

        assert!(tokens.verify_refresh_token(&access).is_none());
        assert!(tokens.verify_access_token(&refresh).is_none());
        assert_eq!(
            tokens.verify_refresh_token(&refresh).as_deref(),
            Some("user-1")
        );
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let tokens = TokenManager {
            access_key: "access-secret".to_string(),
            refresh_key: "refresh-secret".to_string(),
            access_token_age_sec: 0,
        };
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id: "user-1".to_string(),
            iat: now - 120,
            exp: Some(now - 60),
            jti: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();
        assert!(tokens.verify_access_token(&token).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = manager(1800);
        assert!(tokens.verify_access_token("not.a.jwt").is_none());
        assert!(tokens.verify_refresh_token("").is_none());
    }
}
