//! Populating the catalog from video searches.

use crate::catalog_store::{CatalogStore, InsertOutcome, NewSong};
use crate::mood::MoodClassifier;
use crate::video::{watch_url, VideoProvider, VideoSearchHit};
use indicatif::ProgressBar;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::url_import::song_title;

/// Search topics used when none are configured.
pub const DEFAULT_TOPICS: &[&str] = &[
    "kannada film songs",
    "english pop 2024",
    "hindi bollywood hits",
    "tamil movie songs",
    "telugu music",
    "instrumental relax",
    "workout music",
    "romantic songs",
];

pub const DEFAULT_MAX_RESULTS_PER_TOPIC: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub topics_searched: usize,
    pub added: usize,
    /// Hits already in the catalog.
    pub skipped: usize,
    /// Failed searches plus hits that could not be stored.
    pub failed: usize,
}

/// Runs topic searches one after the other and stores every hit, skipping
/// songs already in the catalog. A failure on one topic or one hit is logged
/// and the run goes on.
pub struct BatchIngestor {
    provider: Arc<dyn VideoProvider>,
    catalog: Arc<dyn CatalogStore>,
    classifier: Arc<MoodClassifier>,
}

impl BatchIngestor {
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

    fn to_new_song(&self, hit: &VideoSearchHit) -> NewSong {
        let mood = self
            .classifier
            .classify(&hit.title, Some(&hit.description), &[]);
        NewSong {
            title: song_title(&hit.title),
            artist: hit.channel_name.clone(),
            source_url: watch_url(&hit.video_id),
            mood: mood.to_string(),
        }
    }

    pub async fn ingest_topic(
        &self,
        topic: &str,
        max_results: usize,
        summary: &mut IngestionSummary,
    ) {
        summary.topics_searched += 1;
        let query = format!("{} music", topic);
        let hits = match self.provider.search_videos(&query, max_results).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!("Search for '{}' failed: {}", topic, err);
                summary.failed += 1;
                return;
            }
        };
        debug!("'{}' returned {} hits", topic, hits.len());

        for hit in hits.iter().take(max_results) {
            let song = self.to_new_song(hit);
            match self.catalog.insert_song(&song) {
                Ok(InsertOutcome::Inserted(id)) => {
                    info!("Added '{}' ({}) as {}", song.title, id, song.mood);
                    summary.added += 1;
                }
                Ok(InsertOutcome::Duplicate) => {
                    info!("Skipped duplicate '{}' by {}", song.title, song.artist);
                    summary.skipped += 1;
                }
                Err(err) => {
                    warn!("Could not store '{}': {:#}", song.title, err);
                    summary.failed += 1;
                }
            }
        }
    }

    pub async fn run(
        &self,
        topics: &[String],
        max_results: usize,
        progress: Option<&ProgressBar>,
    ) -> IngestionSummary {
        let mut summary = IngestionSummary::default();
        for topic in topics {
            if let Some(bar) = progress {
                bar.set_message(topic.clone());
            }
            self.ingest_topic(topic, max_results, &mut summary).await;
            if let Some(bar) = progress {
                bar.inc(1);
            }
        }
        info!(
            "Ingestion done: {} topics, {} added, {} skipped, {} failed",
            summary.topics_searched, summary.added, summary.skipped, summary.failed
        );
        summary
    }
}
