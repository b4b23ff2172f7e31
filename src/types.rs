use serde::{Deserialize, Serialize};

/// Result of a transcript extraction. Only `transcript` is guaranteed
/// non-empty; title, thumbnail and video id are best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub transcript: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: String,
    #[serde(rename = "videoId", default)]
    pub video_id: String,
}

/// One numbered content panel of the carousel. Slide 1 is reserved for the
/// cover, so content slides are numbered starting at 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub number: u32,
    pub title: String,
    pub content: String,
}

/// The post description plus hashtag block accompanying the carousel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub description: String,
    pub hashtags: String,
}

/// One rendered panel: PNG bytes as base64, named so that lexical sort
/// order equals presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedImage {
    pub name: String,
    pub data: String,
}
