mod service;
mod store;
mod tokens;

pub use service::{AuthenticationsService, TokenPair, INVALID_REFRESH_TOKEN};
pub use store::{AuthenticationStore, SqliteAuthenticationStore};
pub use tokens::TokenManager;
