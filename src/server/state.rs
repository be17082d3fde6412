use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::ingestion::SongImporter;
use crate::mood::MoodClassifier;
use crate::user::UserManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedSongImporter = Arc<SongImporter>;
pub type GuardedMoodClassifier = Arc<MoodClassifier>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub user_manager: GuardedUserManager,
    pub song_importer: GuardedSongImporter,
    pub classifier: GuardedMoodClassifier,
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedSongImporter {
    fn from_ref(input: &ServerState) -> Self {
        input.song_importer.clone()
    }
}

impl FromRef<ServerState> for GuardedMoodClassifier {
    fn from_ref(input: &ServerState) -> Self {
        input.classifier.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
