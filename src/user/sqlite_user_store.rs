use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    DEFAULT_TIMESTAMP,
};
use crate::user::*;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::{
    path::Path,
    str::FromStr,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info};

use super::auth::CredentialHasher;

const USER_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("handle", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[],
    indices: &[("idx_user_handle", "handle")],
};
const PASSWORD_CREDENTIALS_TABLE_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    unique_constraints: &[],
    indices: &[],
};
const AUTH_TOKEN_TABLE_V_0: Table = Table {
    name: "auth_token",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    unique_constraints: &[],
    indices: &[],
};
const PLAYLIST_TABLE_V_0: Table = Table {
    name: "playlist",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["user_id", "name"]],
    indices: &[],
};
const PLAYLIST_SONG_TABLE_V_0: Table = Table {
    name: "playlist_song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "playlist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "playlist",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("song_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "added",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["playlist_id", "song_id"]],
    indices: &[],
};
const SAVED_SONG_TABLE_V_0: Table = Table {
    name: "saved_song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("song_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["user_id", "song_id"]],
    indices: &[],
};
const LISTENING_HISTORY_TABLE_V_0: Table = Table {
    name: "listening_history",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("song_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "played_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "play_duration_sec",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "completed",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    unique_constraints: &[],
    indices: &[("idx_listening_history_user", "user_id")],
};

pub const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        PASSWORD_CREDENTIALS_TABLE_V_0,
        AUTH_TOKEN_TABLE_V_0,
        PLAYLIST_TABLE_V_0,
        PLAYLIST_SONG_TABLE_V_0,
        SAVED_SONG_TABLE_V_0,
        LISTENING_HISTORY_TABLE_V_0,
    ],
    migration: None,
}];

fn system_time_from_column(secs: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

fn auth_token_from_row(row: &Row) -> rusqlite::Result<AuthToken> {
    Ok(AuthToken {
        user_id: row.get(0)?,
        value: AuthTokenValue(row.get(1)?),
        created: system_time_from_column(row.get(2)?),
        last_used: row.get::<_, Option<i64>>(3)?.map(system_time_from_column),
    })
}

fn history_entry_from_row(row: &Row) -> rusqlite::Result<ListeningHistoryEntry> {
    Ok(ListeningHistoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        song_id: row.get(2)?,
        played_at: row.get(3)?,
        play_duration_sec: row.get(4)?,
        completed: row.get::<_, i64>(5)? != 0,
    })
}

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned(db_path, USER_VERSIONED_SCHEMAS)
            .context("Failed to open user database")?;
        let user_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM user", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened user store: {} users", user_count);
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, user_handle: &str, email: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (handle, email) VALUES (?1, ?2)",
            params![user_handle, email],
        )
        .with_context(|| format!("Failed to create user {}", user_handle))?;
        Ok(conn.last_insert_rowid() as usize)
    }

    fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, handle, email, created FROM user WHERE id = ?1",
            params![user_id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    handle: row.get(1)?,
                    email: row.get(2)?,
                    created: row.get(3)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Failed to read user {}", user_id))
    }

    fn get_user_id(&self, user_handle: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id FROM user WHERE handle = ?1",
                params![user_handle],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id FROM user WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn get_users_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn delete_all_song_references(&self) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut deleted = 0;
        for table in [
            SAVED_SONG_TABLE_V_0.name,
            PLAYLIST_SONG_TABLE_V_0.name,
            LISTENING_HISTORY_TABLE_V_0.name,
        ] {
            deleted += tx.execute(&format!("DELETE FROM {}", table), [])?;
        }
        tx.commit()?;
        debug!("Deleted {} song references", deleted);
        Ok(deleted)
    }
}

impl UserAuthCredentialsStore for SqliteUserStore {
    fn get_password_credentials(
        &self,
        user_handle: &str,
    ) -> Result<Option<UsernamePasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT c.user_id, c.salt, c.hash, c.hasher, c.created, c.last_used \
                 FROM user_password_credentials c JOIN user u ON u.id = c.user_id \
                 WHERE u.handle = ?1",
                params![user_handle],
                |row| {
                    Ok((
                        row.get::<_, usize>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((user_id, salt, hash, hasher, created, last_used)) = row else {
            return Ok(None);
        };
        Ok(Some(UsernamePasswordCredentials {
            user_id,
            salt,
            hash,
            hasher: CredentialHasher::from_str(&hasher)?,
            created: system_time_from_column(created),
            last_used: last_used.map(system_time_from_column),
        }))
    }

    fn set_password_credentials(&self, credentials: &UsernamePasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_password_credentials (user_id, salt, hash, hasher) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(user_id) DO UPDATE SET salt = excluded.salt, hash = excluded.hash, hasher = excluded.hasher",
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string()
            ],
        )
        .with_context(|| format!("Failed to store credentials of user {}", credentials.user_id))?;
        Ok(())
    }

    fn touch_password_credentials(&self, user_id: usize) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "UPDATE user_password_credentials SET last_used = {} WHERE user_id = ?1",
                DEFAULT_TIMESTAMP
            ),
            params![user_id],
        )?;
        Ok(())
    }
}

impl UserAuthTokenStore for SqliteUserStore {
    fn get_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT user_id, value, created, last_used FROM auth_token WHERE value = ?1",
                params![value.0],
                auth_token_from_row,
            )
            .optional()?)
    }

    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let Some(existing) = self.get_user_auth_token(token)? else {
            return Ok(None);
        };
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM auth_token WHERE value = ?1",
            params![existing.value.0],
        )?;
        Ok(Some(existing))
    }

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "UPDATE auth_token SET last_used = {} WHERE value = ?1",
                DEFAULT_TIMESTAMP
            ),
            params![token.0],
        )?;
        Ok(())
    }

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO auth_token (value, user_id) VALUES (?1, ?2)",
            params![token.value.0, token.user_id],
        )?;
        Ok(())
    }
}

impl UserFavoritesStore for SqliteUserStore {
    fn add_saved_song(&self, user_id: usize, song_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO saved_song (user_id, song_id) VALUES (?1, ?2)",
            params![user_id, song_id],
        )?;
        Ok(inserted > 0)
    }

    fn remove_saved_song(&self, user_id: usize, song_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM saved_song WHERE user_id = ?1 AND song_id = ?2",
            params![user_id, song_id],
        )?;
        Ok(deleted > 0)
    }

    fn get_saved_songs(&self, user_id: usize) -> Result<Vec<SavedSong>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT song_id, created FROM saved_song WHERE user_id = ?1 ORDER BY created DESC, id DESC",
        )?;
        let saved = stmt
            .query_map(params![user_id], |row| {
                Ok(SavedSong {
                    song_id: row.get(0)?,
                    saved_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(saved)
    }
}

impl UserPlaylistStore for SqliteUserStore {
    fn create_playlist(&self, user_id: usize, name: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO playlist (user_id, name) VALUES (?1, ?2)",
                params![user_id, name],
            )
            .with_context(|| format!("Failed to create playlist {} for user {}", name, user_id))?;
        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(conn.last_insert_rowid() as usize))
    }

    fn get_playlist(&self, playlist_id: usize) -> Result<Option<Playlist>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, user_id, name, created FROM playlist WHERE id = ?1",
                params![playlist_id],
                |row| {
                    Ok(Playlist {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        created: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    fn get_user_playlists(&self, user_id: usize) -> Result<Vec<PlaylistSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.created, COUNT(ps.id) FROM playlist p \
             LEFT JOIN playlist_song ps ON ps.playlist_id = p.id \
             WHERE p.user_id = ?1 GROUP BY p.id ORDER BY p.created DESC, p.id DESC",
        )?;
        let playlists = stmt
            .query_map(params![user_id], |row| {
                Ok(PlaylistSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created: row.get(2)?,
                    song_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(playlists)
    }

    fn delete_playlist(&self, playlist_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM playlist WHERE id = ?1", params![playlist_id])?;
        Ok(deleted > 0)
    }

    fn add_playlist_song(&self, playlist_id: usize, song_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO playlist_song (playlist_id, song_id) VALUES (?1, ?2)",
            params![playlist_id, song_id],
        )?;
        Ok(inserted > 0)
    }

    fn remove_playlist_song(&self, playlist_id: usize, song_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM playlist_song WHERE playlist_id = ?1 AND song_id = ?2",
            params![playlist_id, song_id],
        )?;
        Ok(deleted > 0)
    }

    fn get_playlist_song_ids(&self, playlist_id: usize) -> Result<Vec<usize>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT song_id FROM playlist_song WHERE playlist_id = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map(params![playlist_id], |row| row.get(0))?
            .collect::<Result<Vec<usize>, _>>()?;
        Ok(ids)
    }
}

impl UserListeningStore for SqliteUserStore {
    fn record_listening_event(&self, user_id: usize, event: &ListeningEvent) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO listening_history (user_id, song_id, play_duration_sec, completed) VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                event.song_id,
                event.play_duration_sec,
                event.completed as i64
            ],
        )
        .with_context(|| format!("Failed to record play of song {}", event.song_id))?;
        Ok(conn.last_insert_rowid() as usize)
    }

    fn get_listening_history(
        &self,
        user_id: usize,
        limit: usize,
    ) -> Result<Vec<ListeningHistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, song_id, played_at, play_duration_sec, completed \
             FROM listening_history WHERE user_id = ?1 \
             ORDER BY played_at DESC, id DESC LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(params![user_id, limit], history_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
