use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snippet metadata of a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub channel_name: String,
    pub tags: Vec<String>,
}

/// One result of a video search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchHit {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_name: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("video not found")]
    NotFound,
    #[error("video service error: {0}")]
    ServiceError(String),
}

// Wire format of the YouTube Data API v3 responses, limited to the fields we
// read.

#[derive(Debug, Deserialize)]
pub(super) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoItem {
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

impl TryFrom<Snippet> for VideoDetails {
    type Error = LookupError;

    /// A snippet without a title or channel is unusable as a song.
    fn try_from(snippet: Snippet) -> Result<Self, Self::Error> {
        if snippet.title.trim().is_empty() || snippet.channel_title.trim().is_empty() {
            return Err(LookupError::ServiceError(
                "incomplete video snippet".to_string(),
            ));
        }
        Ok(VideoDetails {
            title: snippet.title,
            description: snippet.description,
            channel_name: snippet.channel_title,
            tags: snippet.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_video_list_without_tags() {
        let body = r#"{"items":[{"id":"abc","snippet":{"title":"T","description":"D","channelTitle":"C"}}]}"#;
        let parsed: ListResponse<VideoItem> = serde_json::from_str(body).unwrap();
        let snippet = parsed.items.into_iter().next().unwrap().snippet;
        let details = VideoDetails::try_from(snippet).unwrap();
        assert_eq!(details.channel_name, "C");
        assert!(details.tags.is_empty());
    }

    #[test]
    fn snippet_without_title_or_channel_is_rejected() {
        for body in [
            r#"{"items":[{"snippet":{}}]}"#,
            r#"{"items":[{"snippet":{"title":"T"}}]}"#,
            r#"{"items":[{"snippet":{"title":"  ","channelTitle":"C"}}]}"#,
        ] {
            let parsed: ListResponse<VideoItem> = serde_json::from_str(body).unwrap();
            let snippet = parsed.items.into_iter().next().unwrap().snippet;
            assert!(matches!(
                VideoDetails::try_from(snippet),
                Err(LookupError::ServiceError(_))
            ));
        }
    }

    #[test]
    fn parses_search_items() {
        let body = r#"{"items":[
            {"id":{"kind":"youtube#video","videoId":"abcdefghijk"},"snippet":{"title":"Song","description":"","channelTitle":"Ch"}},
            {"id":{"kind":"youtube#channel","channelId":"x"},"snippet":{"title":"Channel"}}
        ]}"#;
        let parsed: ListResponse<SearchItem> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].id.video_id.as_deref(), Some("abcdefghijk"));
        assert!(parsed.items[1].id.video_id.is_none());
    }
}
