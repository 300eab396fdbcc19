mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub uploads_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub cache_ttl_sec: u64,
    pub access_token_key: Option<String>,
    pub refresh_token_key: Option<String>,
    pub access_token_age_sec: u64,
    pub max_cover_bytes: usize,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub cache_ttl_sec: u64,
    pub access_token_key: String,
    pub refresh_token_key: String,
    pub access_token_age_sec: u64,
    pub max_cover_bytes: usize,
    /// Prefix of the URLs handed out for uploaded files.
    pub public_base_url: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let uploads_dir = file
            .uploads_dir
            .map(PathBuf::from)
            .or_else(|| cli.uploads_dir.clone())
            .unwrap_or_else(|| db_dir.join("uploads"));

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let cache_ttl_sec = file.cache_ttl_sec.unwrap_or(cli.cache_ttl_sec);

        let access_token_key = file
            .access_token_key
            .or_else(|| cli.access_token_key.clone())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!("An access token key is required"))?;
        let refresh_token_key = file
            .refresh_token_key
            .or_else(|| cli.refresh_token_key.clone())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!("A refresh token key is required"))?;
        if access_token_key == refresh_token_key {
            bail!("Access and refresh token keys must differ");
        }
        let access_token_age_sec = file
            .access_token_age_sec
            .unwrap_or(cli.access_token_age_sec);

        let max_cover_bytes = file.max_cover_bytes.unwrap_or(cli.max_cover_bytes);

        let public_base_url = file
            .public_base_url
            .or_else(|| cli.public_base_url.clone())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Ok(Self {
            db_dir,
            uploads_dir,
            port,
            metrics_port,
            logging_level,
            cache_ttl_sec,
            access_token_key,
            refresh_token_key,
            access_token_age_sec,
            max_cover_bytes,
            public_base_url,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn queue_db_path(&self) -> PathBuf {
        self.db_dir.join("queue.db")
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_sec)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            max_cover_bytes: self.max_cover_bytes,
            uploads_dir: self.uploads_dir.clone(),
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
