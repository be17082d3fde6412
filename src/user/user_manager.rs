use crate::catalog_store::{CatalogStore, Song};

use super::{
    user_models::{ListeningEvent, Playlist, PlaylistSummary, User},
    AuthToken, AuthTokenValue, FullUserStore, UsernamePasswordCredentials,
};
use serde::Serialize;
use std::{sync::Arc, time::SystemTime};
use thiserror::Error;
use tracing::info;

const MAX_PLAYLIST_NAME_LENGTH: usize = 200;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Access denied")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistWithSongs {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: usize,
    pub song: Song,
    pub played_at: i64,
    pub play_duration_sec: u32,
    pub completed: bool,
}

/// User-facing operations on top of the user store. Song ids are resolved
/// against the catalog, which lives in a separate database.
pub struct UserManager {
    catalog: Arc<dyn CatalogStore>,
    user_store: Arc<dyn FullUserStore>,
}

fn require_non_empty<'a>(value: &'a str, field: &str) -> UserResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed)
}

impl UserManager {
    pub fn new(catalog: Arc<dyn CatalogStore>, user_store: Arc<dyn FullUserStore>) -> Self {
        Self {
            catalog,
            user_store,
        }
    }

    pub fn signup(&self, username: &str, email: &str, password: &str) -> UserResult<User> {
        let username = require_non_empty(username, "username")?;
        let email = require_non_empty(email, "email")?;
        if password.is_empty() {
            return Err(UserError::InvalidInput("password is required".to_string()));
        }

        if self.user_store.get_user_id(username)?.is_some()
            || self.user_store.get_user_id_by_email(email)?.is_some()
        {
            return Err(UserError::AlreadyExists(
                "Username or email already exists".to_string(),
            ));
        }

        let user_id = self.user_store.create_user(username, email)?;
        let credentials = UsernamePasswordCredentials::from_plain(user_id, password)?;
        self.user_store.set_password_credentials(&credentials)?;
        info!("Created user {} ({})", username, user_id);

        self.get_user(user_id)
    }

    pub fn login(&self, username: &str, password: &str) -> UserResult<(User, AuthToken)> {
        let username = require_non_empty(username, "username")?;
        if password.is_empty() {
            return Err(UserError::InvalidInput("password is required".to_string()));
        }

        let credentials = self
            .user_store
            .get_password_credentials(username)?
            .ok_or(UserError::InvalidCredentials)?;
        if !credentials.verify(password)? {
            return Err(UserError::InvalidCredentials);
        }
        self.user_store
            .touch_password_credentials(credentials.user_id)?;

        let token = AuthToken {
            user_id: credentials.user_id,
            value: AuthTokenValue::generate(),
            created: SystemTime::now(),
            last_used: None,
        };
        self.user_store.add_user_auth_token(&token)?;
        let user = self.get_user(credentials.user_id)?;
        Ok((user, token))
    }

    /// Resolves a session token, refreshing its last-used timestamp.
    pub fn get_auth_token(&self, value: &AuthTokenValue) -> UserResult<Option<AuthToken>> {
        let token = self.user_store.get_user_auth_token(value)?;
        if token.is_some() {
            self.user_store
                .update_user_auth_token_last_used_timestamp(value)?;
        }
        Ok(token)
    }

    pub fn logout(&self, value: &AuthTokenValue) -> UserResult<()> {
        self.user_store
            .delete_user_auth_token(value)?
            .ok_or_else(|| UserError::NotFound("Session not found".to_string()))?;
        Ok(())
    }

    pub fn get_user(&self, user_id: usize) -> UserResult<User> {
        self.user_store
            .get_user(user_id)?
            .ok_or_else(|| UserError::NotFound("User not found".to_string()))
    }

    pub fn get_users_count(&self) -> UserResult<usize> {
        Ok(self.user_store.get_users_count()?)
    }

    fn require_song(&self, song_id: usize) -> UserResult<Song> {
        self.catalog
            .get_song(song_id)?
            .ok_or_else(|| UserError::NotFound("Song not found".to_string()))
    }

    // Favorites

    pub fn get_favorites(&self, user_id: usize) -> UserResult<Vec<Song>> {
        let ids: Vec<usize> = self
            .user_store
            .get_saved_songs(user_id)?
            .into_iter()
            .map(|saved| saved.song_id)
            .collect();
        Ok(self.catalog.get_songs(&ids)?)
    }

    pub fn add_favorite(&self, user_id: usize, song_id: usize) -> UserResult<Song> {
        let song = self.require_song(song_id)?;
        if !self.user_store.add_saved_song(user_id, song_id)? {
            return Err(UserError::AlreadyExists(
                "Song already in favorites".to_string(),
            ));
        }
        Ok(song)
    }

    pub fn remove_favorite(&self, user_id: usize, song_id: usize) -> UserResult<()> {
        if !self.user_store.remove_saved_song(user_id, song_id)? {
            return Err(UserError::NotFound("Song not in favorites".to_string()));
        }
        Ok(())
    }

    // Playlists

    pub fn get_playlists(&self, user_id: usize) -> UserResult<Vec<PlaylistSummary>> {
        Ok(self.user_store.get_user_playlists(user_id)?)
    }

    pub fn create_playlist(&self, user_id: usize, name: &str) -> UserResult<Playlist> {
        let name = require_non_empty(name, "playlist_name")?;
        if name.chars().count() > MAX_PLAYLIST_NAME_LENGTH {
            return Err(UserError::InvalidInput(format!(
                "playlist_name must be at most {} characters",
                MAX_PLAYLIST_NAME_LENGTH
            )));
        }
        let playlist_id = self
            .user_store
            .create_playlist(user_id, name)?
            .ok_or_else(|| {
                UserError::AlreadyExists("Playlist with this name already exists".to_string())
            })?;
        self.owned_playlist(user_id, playlist_id)
    }

    fn owned_playlist(&self, user_id: usize, playlist_id: usize) -> UserResult<Playlist> {
        let playlist = self
            .user_store
            .get_playlist(playlist_id)?
            .ok_or_else(|| UserError::NotFound("Playlist not found".to_string()))?;
        if playlist.user_id != user_id {
            return Err(UserError::Forbidden);
        }
        Ok(playlist)
    }

    pub fn get_playlist(
        &self,
        user_id: usize,
        playlist_id: usize,
    ) -> UserResult<PlaylistWithSongs> {
        let playlist = self.owned_playlist(user_id, playlist_id)?;
        let song_ids = self.user_store.get_playlist_song_ids(playlist_id)?;
        let songs = self.catalog.get_songs(&song_ids)?;
        Ok(PlaylistWithSongs { playlist, songs })
    }

    pub fn delete_playlist(&self, user_id: usize, playlist_id: usize) -> UserResult<()> {
        self.owned_playlist(user_id, playlist_id)?;
        self.user_store.delete_playlist(playlist_id)?;
        Ok(())
    }

    pub fn add_song_to_playlist(
        &self,
        user_id: usize,
        playlist_id: usize,
        song_id: usize,
    ) -> UserResult<Song> {
        self.owned_playlist(user_id, playlist_id)?;
        let song = self.require_song(song_id)?;
        if !self.user_store.add_playlist_song(playlist_id, song_id)? {
            return Err(UserError::AlreadyExists(
                "Song already in playlist".to_string(),
            ));
        }
        Ok(song)
    }

    pub fn remove_song_from_playlist(
        &self,
        user_id: usize,
        playlist_id: usize,
        song_id: usize,
    ) -> UserResult<()> {
        self.owned_playlist(user_id, playlist_id)?;
        if !self.user_store.remove_playlist_song(playlist_id, song_id)? {
            return Err(UserError::NotFound("Song not in playlist".to_string()));
        }
        Ok(())
    }

    // Listening history

    pub fn record_play(&self, user_id: usize, event: &ListeningEvent) -> UserResult<usize> {
        self.require_song(event.song_id)?;
        Ok(self.user_store.record_listening_event(user_id, event)?)
    }

    /// Most recent plays first. Plays of songs no longer in the catalog are
    /// left out.
    pub fn get_history(&self, user_id: usize, limit: usize) -> UserResult<Vec<HistoryItem>> {
        let entries = self.user_store.get_listening_history(user_id, limit)?;
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(song) = self.catalog.get_song(entry.song_id)? {
                items.push(HistoryItem {
                    id: entry.id,
                    song,
                    played_at: entry.played_at,
                    play_duration_sec: entry.play_duration_sec,
                    completed: entry.completed,
                });
            }
        }
        Ok(items)
    }

    /// Removes every user reference to songs, for when the catalog is wiped.
    pub fn clear_song_references(&self) -> UserResult<usize> {
        Ok(self.user_store.delete_all_song_references()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{InsertOutcome, NewSong, SqliteCatalogStore};
    use crate::user::SqliteUserStore;
    use tempfile::TempDir;

    struct Fixture {
        manager: UserManager,
        catalog: Arc<SqliteCatalogStore>,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(SqliteCatalogStore::new(dir.path().join("catalog.db")).unwrap());
        let users = Arc::new(SqliteUserStore::new(dir.path().join("user.db")).unwrap());
        let manager = UserManager::new(catalog.clone(), users);
        Fixture {
            manager,
            catalog,
            _dir: dir,
        }
    }

    fn add_song(catalog: &SqliteCatalogStore, title: &str) -> usize {
        let outcome = catalog
            .insert_song(&NewSong {
                title: title.to_string(),
                artist: "Artist".to_string(),
                source_url: format!("https://www.youtube.com/watch?v={:x<11}", title),
                mood: "happy".to_string(),
            })
            .unwrap();
        match outcome {
            InsertOutcome::Inserted(id) => id,
            InsertOutcome::Duplicate => panic!("duplicate"),
        }
    }

    #[test]
    fn signup_then_login() {
        let f = fixture();
        let user = f.manager.signup("alice", "a@example.com", "pw").unwrap();
        assert_eq!(user.handle, "alice");

        let (logged_in, token) = f.manager.login("alice", "pw").unwrap();
        assert_eq!(logged_in.id, user.id);
        let resolved = f.manager.get_auth_token(&token.value).unwrap().unwrap();
        assert_eq!(resolved.user_id, user.id);

        f.manager.logout(&token.value).unwrap();
        assert!(f.manager.get_auth_token(&token.value).unwrap().is_none());
    }

    #[test]
    fn signup_rejects_missing_and_taken() {
        let f = fixture();
        assert!(matches!(
            f.manager.signup(" ", "a@example.com", "pw"),
            Err(UserError::InvalidInput(_))
        ));
        f.manager.signup("alice", "a@example.com", "pw").unwrap();
        assert!(matches!(
            f.manager.signup("alice", "b@example.com", "pw"),
            Err(UserError::AlreadyExists(_))
        ));
        assert!(matches!(
            f.manager.signup("bob", "a@example.com", "pw"),
            Err(UserError::AlreadyExists(_))
        ));
    }

    #[test]
    fn login_rejects_bad_credentials() {
        let f = fixture();
        f.manager.signup("alice", "a@example.com", "pw").unwrap();
        assert!(matches!(
            f.manager.login("alice", "nope"),
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            f.manager.login("nobody", "pw"),
            Err(UserError::InvalidCredentials)
        ));
    }

    #[test]
    fn favorites_resolve_songs() {
        let f = fixture();
        let user = f.manager.signup("alice", "a@example.com", "pw").unwrap();
        let song = add_song(&f.catalog, "one");

        f.manager.add_favorite(user.id, song).unwrap();
        assert!(matches!(
            f.manager.add_favorite(user.id, song),
            Err(UserError::AlreadyExists(_))
        ));
        assert!(matches!(
            f.manager.add_favorite(user.id, 999),
            Err(UserError::NotFound(_))
        ));
        let favorites = f.manager.get_favorites(user.id).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].title, "one");

        f.manager.remove_favorite(user.id, song).unwrap();
        assert!(matches!(
            f.manager.remove_favorite(user.id, song),
            Err(UserError::NotFound(_))
        ));
    }

    #[test]
    fn playlists_are_owner_only() {
        let f = fixture();
        let alice = f.manager.signup("alice", "a@example.com", "pw").unwrap();
        let bob = f.manager.signup("bob", "b@example.com", "pw").unwrap();
        let song = add_song(&f.catalog, "one");

        let playlist = f.manager.create_playlist(alice.id, "Mix").unwrap();
        f.manager
            .add_song_to_playlist(alice.id, playlist.id, song)
            .unwrap();
        assert!(matches!(
            f.manager.add_song_to_playlist(alice.id, playlist.id, song),
            Err(UserError::AlreadyExists(_))
        ));
        assert!(matches!(
            f.manager.get_playlist(bob.id, playlist.id),
            Err(UserError::Forbidden)
        ));

        let full = f.manager.get_playlist(alice.id, playlist.id).unwrap();
        assert_eq!(full.songs.len(), 1);
        assert_eq!(f.manager.get_playlists(alice.id).unwrap()[0].song_count, 1);

        f.manager.delete_playlist(alice.id, playlist.id).unwrap();
        assert!(matches!(
            f.manager.get_playlist(alice.id, playlist.id),
            Err(UserError::NotFound(_))
        ));
    }

    #[test]
    fn history_requires_known_song() {
        let f = fixture();
        let user = f.manager.signup("alice", "a@example.com", "pw").unwrap();
        let song = add_song(&f.catalog, "one");

        let event = ListeningEvent {
            song_id: song,
            play_duration_sec: 12,
            completed: true,
        };
        f.manager.record_play(user.id, &event).unwrap();
        let missing = ListeningEvent {
            song_id: 999,
            ..event.clone()
        };
        assert!(matches!(
            f.manager.record_play(user.id, &missing),
            Err(UserError::NotFound(_))
        ));

        let history = f.manager.get_history(user.id, 50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].song.id, song);
        assert_eq!(history[0].play_duration_sec, 12);
    }
}
