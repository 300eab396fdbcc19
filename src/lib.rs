//! OpenMusic Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod albums;
pub mod authentications;
pub mod cache;
pub mod catalog_db;
pub mod collaborations;
pub mod config;
pub mod errors;
pub mod exports;
pub mod playlists;
pub mod server;
pub mod songs;
pub mod sqlite_persistence;
pub mod storage;
pub mod users;
pub mod validation;

// Re-export commonly used types for convenience
pub use catalog_db::CatalogDb;
pub use errors::{ServiceError, ServiceResult};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
