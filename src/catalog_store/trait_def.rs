//! CatalogStore trait definition.

use super::models::{InsertOutcome, NewSong, Song};
use anyhow::Result;

pub trait CatalogStore: Send + Sync {
    /// Inserts a song unless one with the same `(title, artist)` or source
    /// URL already exists.
    fn insert_song(&self, song: &NewSong) -> Result<InsertOutcome>;

    fn get_song(&self, id: usize) -> Result<Option<Song>>;

    /// Songs for the given ids, in the order given. Unknown ids are skipped.
    fn get_songs(&self, ids: &[usize]) -> Result<Vec<Song>>;

    /// One page of songs, newest first. Pages start at 1.
    fn list_songs(&self, page: usize, page_size: usize) -> Result<Vec<Song>>;

    fn get_song_by_source_url(&self, source_url: &str) -> Result<Option<Song>>;

    /// Case-insensitive substring search on title, artist and mood.
    fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<Song>>;

    fn find_songs_by_mood(&self, mood: &str, limit: usize) -> Result<Vec<Song>>;

    /// Distinct moods present in the catalog, alphabetically.
    fn list_moods(&self) -> Result<Vec<String>>;

    fn get_songs_count(&self) -> Result<usize>;

    /// Removes every song, returning how many were deleted.
    fn delete_all_songs(&self) -> Result<usize>;
}
