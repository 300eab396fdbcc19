//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own databases and uploads dir.

use super::constants::*;
use openmusic_server::authentications::TokenManager;
use openmusic_server::cache::MemoryCache;
use openmusic_server::exports::SqliteMessageQueue;
use openmusic_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use openmusic_server::storage::LocalStorage;
use openmusic_server::CatalogDb;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Export outbox, for asserting on queued messages
    pub queue: SqliteMessageQueue,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the databases cannot be created, the port cannot be bound
    /// or the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let uploads_dir = temp_dir.path().join("uploads");
        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            max_cover_bytes: TEST_MAX_COVER_BYTES,
            uploads_dir: uploads_dir.clone(),
            ..ServerConfig::default()
        };

        let db = CatalogDb::open(temp_dir.path().join("catalog.db"))
            .expect("Failed to open catalog db");
        let queue = SqliteMessageQueue::open(temp_dir.path().join("queue.db"))
            .expect("Failed to open queue db");
        let storage =
            LocalStorage::new(&uploads_dir, &base_url).expect("Failed to create uploads dir");

        let state = ServerState::new(
            config,
            db,
            Arc::new(MemoryCache::new(Duration::from_secs(TEST_CACHE_TTL_SECS))),
            Arc::new(queue.clone()),
            Arc::new(storage),
            TokenManager::new("test-access-key", "test-refresh-key", 1800),
        );
        let app = make_app(state);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            queue,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
