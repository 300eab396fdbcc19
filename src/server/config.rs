use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// Largest accepted album cover upload, in bytes.
    pub max_cover_bytes: usize,
    /// Served as-is under `/upload`.
    pub uploads_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 5000,
            metrics_port: 9091,
            max_cover_bytes: 512_000,
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}
