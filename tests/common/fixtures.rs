//! Test data: a small catalog, two users and a canned video service.

use super::constants::*;
use anyhow::Result;
use async_trait::async_trait;
use moodtunes_server::catalog_store::{CatalogStore, InsertOutcome, NewSong, SqliteCatalogStore};
use moodtunes_server::user::{
    SqliteUserStore, UserAuthCredentialsStore, UserStore, UsernamePasswordCredentials,
};
use moodtunes_server::video::{
    watch_url, LookupError, VideoDetails, VideoProvider, VideoSearchHit,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a catalog database holding the five fixture songs.
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("catalog.db");
    let store = SqliteCatalogStore::new(&db_path)?;

    let songs = [
        (SONG_1_TITLE, ARTIST_1_NAME, "fixtureVid1", "happy"),
        (SONG_2_TITLE, ARTIST_1_NAME, "fixtureVid2", "energetic"),
        (SONG_3_TITLE, ARTIST_2_NAME, "fixtureVid3", "sad"),
        (SONG_4_TITLE, ARTIST_2_NAME, "fixtureVid4", "romantic"),
        (SONG_5_TITLE, ARTIST_3_NAME, "fixtureVid5", "chill"),
    ];
    for (i, (title, artist, video_id, mood)) in songs.into_iter().enumerate() {
        let outcome = store.insert_song(&NewSong {
            title: title.to_string(),
            artist: artist.to_string(),
            source_url: watch_url(video_id),
            mood: mood.to_string(),
        })?;
        assert_eq!(outcome, InsertOutcome::Inserted(i + 1));
    }

    Ok((temp_dir, db_path))
}

/// Creates a user database with the regular and the other test user.
/// Returns their ids in that order.
pub fn create_test_db_with_users() -> Result<(TempDir, PathBuf, usize, usize)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("user.db");

    let (user_id, other_id) = {
        let store = SqliteUserStore::new(&db_path)?;
        let user_id = create_user_with_password(&store, TEST_USER, TEST_EMAIL, TEST_PASS)?;
        let other_id = create_user_with_password(&store, OTHER_USER, OTHER_EMAIL, OTHER_PASS)?;
        (user_id, other_id)
    };

    Ok((temp_dir, db_path, user_id, other_id))
}

pub fn create_user_with_password(
    store: &SqliteUserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<usize> {
    let user_id = store.create_user(username, email)?;
    let credentials = UsernamePasswordCredentials::from_plain(user_id, password)?;
    store.set_password_credentials(&credentials)?;
    Ok(user_id)
}

/// Video service answering from a fixed table.
pub struct StubVideoProvider;

#[async_trait]
impl VideoProvider for StubVideoProvider {
    async fn lookup_video(&self, video_id: &str) -> Result<VideoDetails, LookupError> {
        match video_id {
            VIDEO_ENERGETIC_ID => Ok(VideoDetails {
                title: VIDEO_ENERGETIC_RAW_TITLE.to_string(),
                description: "Full video song from the new movie".to_string(),
                channel_name: VIDEO_ENERGETIC_CHANNEL.to_string(),
                tags: vec!["kannada".to_string(), "dance".to_string()],
            }),
            VIDEO_SAD_ID => Ok(VideoDetails {
                title: "Lonely Tears (Lyrics)".to_string(),
                description: String::new(),
                channel_name: VIDEO_SAD_CHANNEL.to_string(),
                tags: vec![],
            }),
            VIDEO_IN_CATALOG_ID => Ok(VideoDetails {
                title: SONG_1_TITLE.to_string(),
                description: String::new(),
                channel_name: ARTIST_1_NAME.to_string(),
                tags: vec![],
            }),
            VIDEO_BROKEN_ID => Err(LookupError::ServiceError("quota exceeded".to_string())),
            _ => Err(LookupError::NotFound),
        }
    }

    async fn search_videos(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<VideoSearchHit>, LookupError> {
        Ok(vec![])
    }
}
