//! MoodTunes Server Library
//!
//! This library exposes the internal modules for the binaries and for testing.

pub mod catalog_store;
pub mod config;
pub mod ingestion;
pub mod mood;
pub mod server;
pub mod sqlite_persistence;
pub mod title_normalizer;
pub mod user;
pub mod video;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use mood::{Mood, MoodClassifier, MoodLabel};
pub use server::{run_server, RequestsLoggingLevel};
pub use user::{SqliteUserStore, UserManager, UserStore};
pub use video::{VideoProvider, YouTubeClient};
