pub mod auth;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{AuthToken, AuthTokenValue, CredentialHasher, UsernamePasswordCredentials};
pub use sqlite_user_store::{SqliteUserStore, USER_VERSIONED_SCHEMAS};
pub use user_manager::{HistoryItem, PlaylistWithSongs, UserError, UserManager, UserResult};
pub use user_models::{
    ListeningEvent, ListeningHistoryEntry, Playlist, PlaylistSummary, SavedSong, User,
};
pub use user_store::{
    FullUserStore, UserAuthCredentialsStore, UserAuthTokenStore, UserFavoritesStore,
    UserListeningStore, UserPlaylistStore, UserStore,
};
