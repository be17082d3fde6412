use serde::{Deserialize, Serialize};

/// A song as stored in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: usize,
    pub title: String,
    pub artist: String,
    /// Canonical watch URL of the source video.
    pub source_url: String,
    pub mood: String,
    /// Unix timestamp (seconds).
    pub uploaded: i64,
}

/// A song about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub source_url: String,
    pub mood: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(usize),
    /// A song with the same `(title, artist)` or the same source URL already
    /// exists. Nothing was written.
    Duplicate,
}
