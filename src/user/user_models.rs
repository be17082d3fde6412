//! User data models

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: usize,
    pub handle: String,
    pub email: String,
    /// Unix timestamp (seconds).
    pub created: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: usize,
    pub user_id: usize,
    pub name: String,
    pub created: i64,
}

/// A playlist as listed on its owner's page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaylistSummary {
    pub id: usize,
    pub name: String,
    pub created: i64,
    pub song_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavedSong {
    pub song_id: usize,
    pub saved_at: i64,
}

/// A play to be recorded.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ListeningEvent {
    pub song_id: usize,
    #[serde(default)]
    pub play_duration_sec: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListeningHistoryEntry {
    pub id: usize,
    pub user_id: usize,
    pub song_id: usize,
    pub played_at: i64,
    pub play_duration_sec: u32,
    pub completed: bool,
}
