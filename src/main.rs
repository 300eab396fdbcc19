use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use openmusic_server::authentications::TokenManager;
use openmusic_server::cache::MemoryCache;
use openmusic_server::config::{AppConfig, CliConfig, FileConfig};
use openmusic_server::exports::SqliteMessageQueue;
use openmusic_server::server::{self, run_server, RequestsLoggingLevel, ServerState};
use openmusic_server::storage::LocalStorage;
use openmusic_server::CatalogDb;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values found there override the CLI ones.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the catalog and queue databases.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Directory where uploaded covers are written. Defaults to `<db_dir>/uploads`.
    #[clap(long, value_parser = parse_path)]
    pub uploads_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL used when building public links to uploaded files.
    #[clap(long)]
    pub public_base_url: Option<String>,

    /// How long a cached album likes count stays valid, in seconds.
    #[clap(long, default_value_t = 1800)]
    pub cache_ttl_sec: u64,

    /// Key used to sign access tokens.
    #[clap(long, env = "ACCESS_TOKEN_KEY", hide_env_values = true)]
    pub access_token_key: Option<String>,

    /// Key used to sign refresh tokens.
    #[clap(long, env = "REFRESH_TOKEN_KEY", hide_env_values = true)]
    pub refresh_token_key: Option<String>,

    /// Lifetime of access tokens in seconds.
    #[clap(long, env = "ACCESS_TOKEN_AGE", default_value_t = 1800)]
    pub access_token_age_sec: u64,

    /// Largest accepted album cover, e.g. "512000" or "500KB".
    #[clap(long, default_value = "512000", value_parser = parse_byte_size)]
    pub max_cover_bytes: usize,
}

fn parse_byte_size(s: &str) -> Result<usize> {
    let bytes = byte_unit::Byte::parse_str(s, true)
        .with_context(|| format!("Invalid byte size: {}", s))?;
    usize::try_from(bytes.as_u64()).with_context(|| format!("Byte size too large: {}", s))
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            uploads_dir: self.uploads_dir.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            cache_ttl_sec: self.cache_ttl_sec,
            access_token_key: self.access_token_key.clone(),
            refresh_token_key: self.refresh_token_key.clone(),
            access_token_age_sec: self.access_token_age_sec,
            max_cover_bytes: self.max_cover_bytes,
            public_base_url: self.public_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Initializing metrics...");
    server::metrics::init_metrics();

    info!(
        "Opening SQLite catalog database at {:?}...",
        config.catalog_db_path()
    );
    let db = CatalogDb::open(config.catalog_db_path())?;

    info!("Opening export queue at {:?}...", config.queue_db_path());
    let queue = Arc::new(SqliteMessageQueue::open(config.queue_db_path())?);

    let storage = Arc::new(
        LocalStorage::new(&config.uploads_dir, &config.public_base_url)
            .with_context(|| format!("Failed to prepare uploads dir {:?}", config.uploads_dir))?,
    );

    let cache = Arc::new(MemoryCache::new(config.cache_ttl()));
    let cleanup_cache = cache.clone();
    let cleanup_interval = config.cache_ttl().max(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cleanup_interval);

        // Skip the first immediate tick, wait for the first interval
        ticker.tick().await;

        loop {
            ticker.tick().await;
            cleanup_cache.cleanup_expired();
        }
    });

    let tokens = TokenManager::new(
        &config.access_token_key,
        &config.refresh_token_key,
        config.access_token_age_sec,
    );

    let state = ServerState::new(
        config.server_config(),
        db,
        cache,
        queue,
        storage,
        tokens,
    );

    run_server(state).await
}
