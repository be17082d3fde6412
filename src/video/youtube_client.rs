//! HTTP client for the YouTube Data API v3.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ListResponse, SearchItem, VideoItem};
use super::{LookupError, VideoDetails, VideoProvider, VideoSearchHit};

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube's category id for music.
const MUSIC_CATEGORY_ID: &str = "10";

pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// # Arguments
    /// * `base_url` - API root, normally [`DEFAULT_YOUTUBE_API_BASE_URL`]
    /// * `api_key` - developer key sent with every request
    /// * `timeout_sec` - per-request timeout
    pub fn new(base_url: &str, api_key: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::ServiceError(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("YouTube API returned {}: {}", status, body);
            return Err(LookupError::ServiceError(format!("status {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::ServiceError(format!("invalid response: {}", e)))
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn lookup_video(&self, video_id: &str) -> Result<VideoDetails, LookupError> {
        let url = format!(
            "{}/videos?part=snippet&id={}&key={}",
            self.base_url,
            urlencoding::encode(video_id),
            urlencoding::encode(&self.api_key)
        );
        debug!("Looking up video {}", video_id);
        let list: ListResponse<VideoItem> = self.get_json(&url).await?;
        let item = list.items.into_iter().next().ok_or(LookupError::NotFound)?;
        VideoDetails::try_from(item.snippet)
    }

    async fn search_videos(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoSearchHit>, LookupError> {
        let url = format!(
            "{}/search?part=snippet&type=video&videoCategoryId={}&maxResults={}&q={}&key={}",
            self.base_url,
            MUSIC_CATEGORY_ID,
            max_results,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        );
        debug!("Searching videos for '{}'", query);
        let list: ListResponse<SearchItem> = self.get_json(&url).await?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(VideoSearchHit {
                    video_id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                    channel_name: item.snippet.channel_title,
                })
            })
            .collect())
    }
}
