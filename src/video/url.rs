use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_URL_PATTERNS: [Regex; 3] = [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/embed/([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/v/([A-Za-z0-9_-]{11})").unwrap(),
    ];
}

/// Pulls the 11-character video id out of a YouTube watch, short, embed or
/// legacy `/v/` URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
