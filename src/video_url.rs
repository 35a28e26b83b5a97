//! Canonical watch-page URLs for collected video identifiers.

pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Prefix plus identifier, with no encoding or other transformation.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

pub fn watch_urls(video_ids: &[String]) -> Vec<String> {
    video_ids.iter().map(|video_id| watch_url(video_id)).collect()
}
