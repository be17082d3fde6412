use super::auth::{AuthToken, AuthTokenValue, UsernamePasswordCredentials};
use super::user_models::{
    ListeningEvent, ListeningHistoryEntry, Playlist, PlaylistSummary, SavedSong, User,
};
use anyhow::Result;

pub trait UserAuthCredentialsStore: Send + Sync {
    /// Returns the password credentials of the user with the given handle.
    /// Returns Ok(None) if the user does not exist or has no password.
    fn get_password_credentials(&self, user_handle: &str)
        -> Result<Option<UsernamePasswordCredentials>>;

    /// Inserts or replaces the password credentials of a user.
    fn set_password_credentials(&self, credentials: &UsernamePasswordCredentials) -> Result<()>;

    /// Records a successful login with these credentials.
    fn touch_password_credentials(&self, user_id: usize) -> Result<()>;
}

pub trait UserAuthTokenStore: Send + Sync {
    /// Returns Ok(None) if the token does not exist.
    fn get_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Deletes a token, returning it if it existed.
    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()>;

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()>;
}

pub trait UserStore: UserAuthTokenStore + UserAuthCredentialsStore + Send + Sync {
    /// Creates a new user and returns the user id.
    fn create_user(&self, user_handle: &str, email: &str) -> Result<usize>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: usize) -> Result<Option<User>>;

    fn get_user_id(&self, user_handle: &str) -> Result<Option<usize>>;

    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>>;

    fn get_users_count(&self) -> Result<usize>;

    /// Drops every favorite, playlist entry and history row pointing at a
    /// song. Used when the catalog is wiped.
    fn delete_all_song_references(&self) -> Result<usize>;
}

pub trait UserFavoritesStore: Send + Sync {
    /// Returns false if the song was already a favorite.
    fn add_saved_song(&self, user_id: usize, song_id: usize) -> Result<bool>;

    /// Returns false if the song was not a favorite.
    fn remove_saved_song(&self, user_id: usize, song_id: usize) -> Result<bool>;

    /// Favorites, most recently saved first.
    fn get_saved_songs(&self, user_id: usize) -> Result<Vec<SavedSong>>;
}

pub trait UserPlaylistStore: Send + Sync {
    /// Returns Ok(None) if the user already has a playlist with that name.
    fn create_playlist(&self, user_id: usize, name: &str) -> Result<Option<usize>>;

    fn get_playlist(&self, playlist_id: usize) -> Result<Option<Playlist>>;

    /// The user's playlists, newest first, with their song counts.
    fn get_user_playlists(&self, user_id: usize) -> Result<Vec<PlaylistSummary>>;

    /// Deletes a playlist and its entries. Returns false if it didn't exist.
    fn delete_playlist(&self, playlist_id: usize) -> Result<bool>;

    /// Returns false if the song is already in the playlist.
    fn add_playlist_song(&self, playlist_id: usize, song_id: usize) -> Result<bool>;

    /// Returns false if the song was not in the playlist.
    fn remove_playlist_song(&self, playlist_id: usize, song_id: usize) -> Result<bool>;

    /// Song ids in the order they were added.
    fn get_playlist_song_ids(&self, playlist_id: usize) -> Result<Vec<usize>>;
}

pub trait UserListeningStore: Send + Sync {
    /// Returns the id of the new history row.
    fn record_listening_event(&self, user_id: usize, event: &ListeningEvent) -> Result<usize>;

    /// Most recent plays first.
    fn get_listening_history(&self, user_id: usize, limit: usize)
        -> Result<Vec<ListeningHistoryEntry>>;
}

/// Everything the server needs from user storage.
pub trait FullUserStore:
    UserStore + UserFavoritesStore + UserPlaylistStore + UserListeningStore
{
}

impl<T: UserStore + UserFavoritesStore + UserPlaylistStore + UserListeningStore> FullUserStore
    for T
{
}
