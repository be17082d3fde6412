//! Harness for the HTTP end-to-end tests.
//!
//! Every test spawns its own [`TestServer`] (fresh catalog and user
//! databases, stubbed video service) and talks to it through a
//! [`TestClient`]:
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer, SONG_1_ID};
//!
//! #[tokio::test]
//! async fn favorites_start_empty() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::authenticated(server.base_url.clone()).await;
//!     client.add_favorite(client.uid(), SONG_1_ID).await;
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;
