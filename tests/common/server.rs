//! Spawning and stopping per-test servers.

use super::constants::*;
use super::fixtures::{create_test_catalog, create_test_db_with_users, StubVideoProvider};
use moodtunes_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use moodtunes_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use moodtunes_server::user::{FullUserStore, SqliteUserStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A running server backed by throwaway databases.
///
/// Dropping it stops the server and removes the databases.
#[allow(dead_code)]
pub struct TestServer {
    /// e.g. "http://127.0.0.1:41234"
    pub base_url: String,
    pub port: u16,

    /// Id of `TEST_USER`
    pub user_id: usize,
    /// Id of `OTHER_USER`
    pub other_user_id: usize,

    /// The stores the server runs on, for arranging and checking state
    /// behind its back.
    pub catalog_store: Arc<dyn CatalogStore>,
    pub user_store: Arc<dyn FullUserStore>,

    shutdown: Option<oneshot::Sender<()>>,
    _dirs: (TempDir, TempDir),
}

impl TestServer {
    /// Starts a server on a free local port and waits until it answers.
    ///
    /// # Panics
    ///
    /// Panics when the fixtures or the listener can't be set up, or the
    /// server isn't healthy within `SERVER_READY_TIMEOUT_MS`.
    pub async fn spawn() -> Self {
        let (catalog_dir, catalog_db_path) =
            create_test_catalog().expect("Failed to create test catalog");
        let (user_dir, user_db_path, user_id, other_user_id) =
            create_test_db_with_users().expect("Failed to create test users");

        let catalog_store: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::new(&catalog_db_path).expect("Failed to open catalog store"),
        );
        let user_store: Arc<dyn FullUserStore> =
            Arc::new(SqliteUserStore::new(&user_db_path).expect("Failed to open user store"));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local address").port();

        let app = make_app(
            ServerConfig {
                port,
                requests_logging_level: RequestsLoggingLevel::None,
                frontend_dir_path: None,
            },
            catalog_store.clone(),
            user_store.clone(),
            Arc::new(StubVideoProvider),
        )
        .expect("Failed to build app");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server crashed");
        });

        let server = TestServer {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            user_id,
            other_user_id,
            catalog_store,
            user_store,
            shutdown: Some(shutdown_tx),
            _dirs: (catalog_dir, user_dir),
        };
        server.await_healthy().await;
        server
    }

    async fn await_healthy(&self) {
        let health_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build health client");
        let health_url = format!("{}/api/health", self.base_url);

        let polling = async {
            loop {
                if let Ok(response) = health_client.get(&health_url).send().await {
                    if response.status().is_success() {
                        return;
                    }
                }
                tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
            }
        };

        tokio::time::timeout(Duration::from_millis(SERVER_READY_TIMEOUT_MS), polling)
            .await
            .unwrap_or_else(|_| {
                panic!(
                    "Server not healthy after {}ms",
                    SERVER_READY_TIMEOUT_MS
                )
            });
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
