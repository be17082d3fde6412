//! Third-party video metadata: URL parsing and the lookup/search provider.

mod models;
mod url;
mod youtube_client;

pub use models::{LookupError, VideoDetails, VideoSearchHit};
pub use url::{extract_video_id, watch_url};
pub use youtube_client::{YouTubeClient, DEFAULT_YOUTUBE_API_BASE_URL};

use async_trait::async_trait;

/// Source of video metadata.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Fetches the snippet of one video. Never returns partial data.
    async fn lookup_video(&self, video_id: &str) -> Result<VideoDetails, LookupError>;

    /// Searches music videos, returning at most `max_results` hits.
    async fn search_videos(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoSearchHit>, LookupError>;
}
