use super::response::fail;
use super::state::ServerState;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

/// The user an access token was issued to.
#[derive(Debug)]
pub struct Session {
    pub user_id: String,
}

const BEARER_PREFIX: &str = "Bearer ";

pub enum SessionExtractionError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::MissingToken => {
                fail(StatusCode::UNAUTHORIZED, "Missing authentication")
            }
            SessionExtractionError::InvalidToken => {
                fail(StatusCode::UNAUTHORIZED, "Token tidak valid")
            }
        }
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = match extract_bearer_token(parts) {
            Some(token) => token,
            None => {
                debug!("No bearer token in request headers.");
                return Err(SessionExtractionError::MissingToken);
            }
        };

        match ctx.authentications.token_manager().verify_access_token(token) {
            Some(user_id) => Ok(Session { user_id }),
            None => {
                debug!("Rejected access token");
                Err(SessionExtractionError::InvalidToken)
            }
        }
    }
}
