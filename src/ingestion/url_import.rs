//! Importing a single song from a video URL.

use crate::catalog_store::{CatalogStore, InsertOutcome, NewSong, Song};
use crate::mood::{MoodClassifier, MoodLabel};
use crate::title_normalizer::normalize;
use crate::video::{extract_video_id, watch_url, LookupError, VideoProvider};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Video not found")]
    NotFound,
    #[error("Could not fetch video details: {0}")]
    ServiceError(String),
    #[error("Song already exists")]
    DuplicateConflict,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<LookupError> for ImportError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => ImportError::NotFound,
            LookupError::ServiceError(reason) => ImportError::ServiceError(reason),
        }
    }
}

/// What the classifier made of a video, before anything is stored.
#[derive(Debug, Clone, Serialize)]
pub struct VideoAnalysis {
    /// Title as published.
    pub title: String,
    pub clean_title: String,
    pub artist: String,
    pub mood: MoodLabel,
    pub youtube_url: String,
    pub video_id: String,
}

/// Title to store for a video: the normalized title, or the raw one when
/// normalizing leaves nothing.
pub(crate) fn song_title(raw_title: &str) -> String {
    let clean = normalize(raw_title);
    if clean.is_empty() {
        raw_title.trim().to_string()
    } else {
        clean
    }
}

pub struct SongImporter {
    provider: Arc<dyn VideoProvider>,
    catalog: Arc<dyn CatalogStore>,
    classifier: Arc<MoodClassifier>,
}

impl SongImporter {
    pub fn new(
        provider: Arc<dyn VideoProvider>,
        catalog: Arc<dyn CatalogStore>,
        classifier: Arc<MoodClassifier>,
    ) -> Self {
        Self {
            provider,
            catalog,
            classifier,
        }
    }

    fn video_id(url: &str) -> Result<String, ImportError> {
        extract_video_id(url.trim())
            .ok_or_else(|| ImportError::InvalidInput("Invalid YouTube URL".to_string()))
    }

    /// Looks the video up and classifies it without storing anything.
    pub async fn analyze(&self, url: &str) -> Result<VideoAnalysis, ImportError> {
        let video_id = Self::video_id(url)?;
        let details = self.provider.lookup_video(&video_id).await?;
        let mood = self.classifier.classify(
            &details.title,
            Some(&details.description),
            &details.tags,
        );
        Ok(VideoAnalysis {
            clean_title: song_title(&details.title),
            title: details.title,
            artist: details.channel_name,
            mood,
            youtube_url: url.trim().to_string(),
            video_id,
        })
    }

    /// Looks up, classifies and stores a video as a song. A video already in
    /// the catalog, by URL or by `(title, artist)`, is a conflict.
    pub async fn import(&self, url: &str) -> Result<Song, ImportError> {
        let video_id = Self::video_id(url)?;
        let source_url = watch_url(&video_id);
        if self.catalog.get_song_by_source_url(&source_url)?.is_some() {
            return Err(ImportError::DuplicateConflict);
        }

        let analysis = self.analyze(&source_url).await?;
        let new_song = NewSong {
            title: analysis.clean_title,
            artist: analysis.artist,
            source_url,
            mood: analysis.mood.to_string(),
        };
        match self.catalog.insert_song(&new_song)? {
            InsertOutcome::Inserted(id) => {
                info!("Imported '{}' as {} ({})", new_song.title, new_song.mood, id);
                let song = self.catalog.get_song(id)?;
                song.ok_or_else(|| {
                    ImportError::Storage(anyhow::anyhow!("Song {} vanished after insert", id))
                })
            }
            InsertOutcome::Duplicate => Err(ImportError::DuplicateConflict),
        }
    }
}
