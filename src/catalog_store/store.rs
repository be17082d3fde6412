//! SQLite-backed catalog store.

use super::models::{InsertOutcome, NewSong, Song};
use super::schema::{CATALOG_VERSIONED_SCHEMAS, SONG_TABLE_V_0};
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::open_versioned;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const SONG_COLUMNS: &str = "id, title, artist, source_url, mood, uploaded";
const NEWEST_FIRST: &str = "ORDER BY uploaded DESC, id DESC";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

fn song_from_row(row: &Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        source_url: row.get(3)?,
        mood: row.get(4)?,
        uploaded: row.get(5)?,
    })
}

/// Escapes `LIKE` wildcards so user input only matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path, CATALOG_VERSIONED_SCHEMAS)
            .context("Failed to open catalog database")?;

        let song_count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", SONG_TABLE_V_0.name),
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);
        info!("Opened song catalog: {} songs", song_count);

        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn query_songs<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let songs = stmt
            .query_map(params, song_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert_song(&self, song: &NewSong) -> Result<InsertOutcome> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "INSERT OR IGNORE INTO song (title, artist, source_url, mood) VALUES (?1, ?2, ?3, ?4)",
                params![song.title, song.artist, song.source_url, song.mood],
            )
            .with_context(|| format!("Failed to insert song '{}'", song.title))?;
        if changed == 0 {
            return Ok(InsertOutcome::Duplicate);
        }
        Ok(InsertOutcome::Inserted(conn.last_insert_rowid() as usize))
    }

    fn get_song(&self, id: usize) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM song WHERE id = ?1", SONG_COLUMNS),
            params![id],
            song_from_row,
        )
        .optional()
        .with_context(|| format!("Failed to read song {}", id))
    }

    fn get_songs(&self, ids: &[usize]) -> Result<Vec<Song>> {
        let mut songs = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(song) = self.get_song(*id)? {
                songs.push(song);
            }
        }
        Ok(songs)
    }

    fn list_songs(&self, page: usize, page_size: usize) -> Result<Vec<Song>> {
        let offset = match page.saturating_sub(1).checked_mul(page_size) {
            Some(offset) if offset <= i64::MAX as usize => offset,
            // past any row sqlite can hold
            _ => return Ok(vec![]),
        };
        self.query_songs(
            &format!(
                "SELECT {} FROM song {} LIMIT ?1 OFFSET ?2",
                SONG_COLUMNS, NEWEST_FIRST
            ),
            params![page_size, offset],
        )
    }

    fn get_song_by_source_url(&self, source_url: &str) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM song WHERE source_url = ?1", SONG_COLUMNS),
            params![source_url],
            song_from_row,
        )
        .optional()
        .context("Failed to look up song by source url")
    }

    fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<Song>> {
        self.query_songs(
            &format!(
                "SELECT {} FROM song \
                 WHERE lower(title) LIKE ?1 ESCAPE '\\' \
                 OR lower(artist) LIKE ?1 ESCAPE '\\' \
                 OR lower(mood) LIKE ?1 ESCAPE '\\' \
                 {} LIMIT ?2",
                SONG_COLUMNS, NEWEST_FIRST
            ),
            params![like_pattern(query), limit],
        )
    }

    fn find_songs_by_mood(&self, mood: &str, limit: usize) -> Result<Vec<Song>> {
        self.query_songs(
            &format!(
                "SELECT {} FROM song WHERE mood = ?1 {} LIMIT ?2",
                SONG_COLUMNS, NEWEST_FIRST
            ),
            params![mood, limit],
        )
    }

    fn list_moods(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DISTINCT mood FROM song ORDER BY mood")?;
        let moods = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(moods)
    }

    fn get_songs_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM song", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn delete_all_songs(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM song", [])
            .context("Failed to clear songs")?;
        info!("Deleted {} songs from the catalog", deleted);
        Ok(deleted)
    }
}
