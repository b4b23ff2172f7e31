//! Cover assembly: thumbnail fetch with a bounded fallback chain.
//!
//! The thumbnail is fetched at full resolution first; YouTube serves a 404
//! (or a placeholder) for videos without a `maxresdefault`, so a single
//! retry swaps in the `hqdefault` variant. Both failing drops to the
//! text-only cover template. The composite itself is rendered through the
//! shared browser with the thumbnail inlined as a data URI, keeping one
//! rendering path for every panel.

use base64::Engine;
use reqwest::Client;

use super::template;

/// Fetch the cover thumbnail, trying the lower-resolution variant once if
/// the full-resolution fetch fails. Returns the image as a data URI, or
/// `None` when both attempts fail.
pub async fn fetch_thumbnail_data_uri(client: &Client, thumbnail_url: &str) -> Option<String> {
    if thumbnail_url.is_empty() {
        return None;
    }

    if let Some(uri) = fetch_as_data_uri(client, thumbnail_url).await {
        return Some(uri);
    }

    let fallback_url = thumbnail_url.replace("maxresdefault", "hqdefault");
    if fallback_url == thumbnail_url {
        return None;
    }
    tracing::warn!(url = %fallback_url, "full-res thumbnail failed, trying fallback");
    fetch_as_data_uri(client, &fallback_url).await
}

async fn fetch_as_data_uri(client: &Client, url: &str) -> Option<String> {
    let resp = match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            tracing::warn!(url, status = resp.status().as_u16(), "thumbnail fetch failed");
            return None;
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "thumbnail fetch failed");
            return None;
        }
    };

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = resp.bytes().await.ok()?;
    if bytes.is_empty() {
        return None;
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Some(format!("data:{content_type};base64,{encoded}"))
}

/// Markup for the cover: the thumbnail composite when a thumbnail could be
/// fetched, the text-only fallback otherwise.
pub async fn cover_markup(client: &Client, title: &str, thumbnail_url: &str) -> String {
    match fetch_thumbnail_data_uri(client, thumbnail_url).await {
        Some(data_uri) => template::cover_html(title, &data_uri),
        None => template::cover_fallback_html(title),
    }
}
