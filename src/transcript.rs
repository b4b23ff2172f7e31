//! Transcript extraction via the Apify `karamelo~youtube-transcripts` actor.
//!
//! Submits a run with a bounded wait, reads the run's dataset, and
//! normalizes the first item. The extractor's item schema varies, so the
//! transcript text is taken from the first of several known field names.

use reqwest::Client;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{CarouselError, Result};
use crate::types::TranscriptResult;

const APIFY_BASE_URL: &str = "https://api.apify.com/v2";
const ACTOR_ID: &str = "karamelo~youtube-transcripts";
/// Bounded wait for the extraction run, in seconds.
const WAIT_FOR_FINISH_SECS: u32 = 120;

/// Field names the extractor has been observed to put transcript text under.
const TRANSCRIPT_FIELDS: [&str; 4] = ["captions", "text", "transcript", "content"];

pub struct TranscriptRetriever {
    base_url: String,
}

impl Default for TranscriptRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptRetriever {
    pub fn new() -> Self {
        Self {
            base_url: APIFY_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run the extraction job for `url` and normalize the result.
    ///
    /// Fails if the job yields no items, the item carries an explicit
    /// `error` field, or the extracted text is empty after trimming.
    /// Title and thumbnail are best-effort.
    pub async fn retrieve(
        &self,
        client: &Client,
        config: &Config,
        url: &str,
    ) -> Result<TranscriptResult> {
        let token = config.apify_token()?;

        let run = self.start_run(client, token, url).await?;
        let status = run
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN");
        if status != "SUCCEEDED" {
            return Err(CarouselError::ExternalService {
                service: "apify",
                message: format!("extraction run finished with status {status}"),
            });
        }

        let dataset_id = run
            .get("defaultDatasetId")
            .and_then(Value::as_str)
            .ok_or_else(|| CarouselError::ExternalService {
                service: "apify",
                message: "run response missing defaultDatasetId".into(),
            })?;

        let items = self.fetch_items(client, token, dataset_id).await?;
        let item = items.first().ok_or_else(|| CarouselError::ExternalService {
            service: "apify",
            message: "no transcript items; the video may have no captions".into(),
        })?;

        if let Some(error) = item.get("error").and_then(Value::as_str) {
            return Err(CarouselError::ExternalService {
                service: "apify",
                message: error.to_string(),
            });
        }

        let transcript = TRANSCRIPT_FIELDS
            .iter()
            .find_map(|field| item.get(*field).and_then(Value::as_str))
            .unwrap_or("")
            .trim()
            .to_string();
        if transcript.is_empty() {
            return Err(CarouselError::ExternalService {
                service: "apify",
                message: "transcript is empty; the video may have no captions".into(),
            });
        }

        let video_id = extract_video_id(url).unwrap_or_default();
        let thumbnail_url = if video_id.is_empty() {
            String::new()
        } else {
            format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
        };

        Ok(TranscriptResult {
            transcript,
            title: item
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            thumbnail_url,
            video_id,
        })
    }

    async fn start_run(&self, client: &Client, token: &str, url: &str) -> Result<Value> {
        let endpoint = format!("{}/acts/{}/runs", self.base_url, ACTOR_ID);
        let input = json!({
            "urls": [url],
            "outputFormat": "singleStringText",
        });

        let resp = client
            .post(&endpoint)
            .query(&[
                ("token", token),
                ("waitForFinish", &WAIT_FOR_FINISH_SECS.to_string()),
            ])
            .json(&input)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CarouselError::ExternalService {
                service: "apify",
                message: format!("run request failed with HTTP {status}: {body}"),
            });
        }

        let body: Value = resp.json().await?;
        body.get("data")
            .cloned()
            .ok_or_else(|| CarouselError::ExternalService {
                service: "apify",
                message: "run response missing data".into(),
            })
    }

    async fn fetch_items(&self, client: &Client, token: &str, dataset_id: &str) -> Result<Vec<Value>> {
        let endpoint = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        let resp = client
            .get(&endpoint)
            .query(&[("token", token)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(CarouselError::ExternalService {
                service: "apify",
                message: format!("dataset fetch failed with HTTP {status}"),
            });
        }

        Ok(resp.json().await?)
    }
}

/// Whether `url` matches one of the known YouTube link shapes.
pub fn is_youtube_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    rest.starts_with("youtube.com/watch?v=")
        || rest.starts_with("youtube.com/shorts/")
        || rest.starts_with("youtu.be/")
}

/// Extract the canonical 11-char video id from a known URL shape.
pub fn extract_video_id(url: &str) -> Option<String> {
    for marker in ["v=", "/shorts/", "youtu.be/"] {
        if let Some(pos) = url.find(marker) {
            let candidate: String = url[pos + marker.len()..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .take(11)
                .collect();
            if candidate.len() == 11 {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_watch_urls() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc12345678"));
        assert!(is_youtube_url("http://youtube.com/watch?v=abc12345678"));
        assert!(is_youtube_url("youtube.com/watch?v=abc12345678"));
    }

    #[test]
    fn recognizes_shorts_and_short_links() {
        assert!(is_youtube_url("https://youtube.com/shorts/abc12345678"));
        assert!(is_youtube_url("https://youtu.be/abc12345678"));
    }

    #[test]
    fn rejects_other_urls() {
        assert!(!is_youtube_url("https://vimeo.com/12345"));
        assert!(!is_youtube_url("https://example.com/watch?v=abc12345678"));
        assert!(!is_youtube_url("not a url"));
    }

    #[test]
    fn video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc12345678&t=10"),
            Some("abc12345678".to_string())
        );
    }

    #[test]
    fn video_id_from_short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc12345678"),
            Some("abc12345678".to_string())
        );
    }

    #[test]
    fn video_id_from_shorts() {
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/a_b-1234567?feature=share"),
            Some("a_b-1234567".to_string())
        );
    }

    #[test]
    fn short_id_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/tooshort"), None);
    }

    #[test]
    fn thumbnail_derivation_shape() {
        let id = extract_video_id("https://youtu.be/abc12345678").unwrap();
        let url = format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg");
        assert_eq!(url, "https://img.youtube.com/vi/abc12345678/maxresdefault.jpg");
    }

    async fn spawn_stub(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn config_with_token() -> Config {
        Config {
            apify_api_key: Some("token".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn retrieve_normalizes_first_item() {
        use axum::routing::{get, post};
        use axum::{Json, Router};

        let app = Router::new()
            .route(
                "/acts/karamelo~youtube-transcripts/runs",
                post(|| async {
                    Json(json!({
                        "data": { "status": "SUCCEEDED", "defaultDatasetId": "ds1" }
                    }))
                }),
            )
            .route(
                "/datasets/ds1/items",
                get(|| async {
                    Json(json!([
                        { "captions": " some transcript ", "title": "My Video" }
                    ]))
                }),
            );
        let base = spawn_stub(app).await;

        let retriever = TranscriptRetriever::new().with_base_url(base);
        let result = retriever
            .retrieve(
                &Client::new(),
                &config_with_token(),
                "https://youtu.be/abc12345678",
            )
            .await
            .unwrap();

        assert_eq!(result.transcript, "some transcript");
        assert_eq!(result.title, "My Video");
        assert_eq!(result.video_id, "abc12345678");
        assert_eq!(
            result.thumbnail_url,
            "https://img.youtube.com/vi/abc12345678/maxresdefault.jpg"
        );
    }

    #[tokio::test]
    async fn failed_run_is_external_error() {
        use axum::routing::post;
        use axum::{Json, Router};

        let app = Router::new().route(
            "/acts/karamelo~youtube-transcripts/runs",
            post(|| async { Json(json!({ "data": { "status": "FAILED" } })) }),
        );
        let base = spawn_stub(app).await;

        let retriever = TranscriptRetriever::new().with_base_url(base);
        let err = retriever
            .retrieve(
                &Client::new(),
                &config_with_token(),
                "https://youtu.be/abc12345678",
            )
            .await
            .unwrap_err();
        match err {
            CarouselError::ExternalService { service, message } => {
                assert_eq!(service, "apify");
                assert!(message.contains("FAILED"));
            }
            other => panic!("expected ExternalService, got {other}"),
        }
    }

    #[tokio::test]
    async fn empty_dataset_is_external_error() {
        use axum::routing::{get, post};
        use axum::{Json, Router};

        let app = Router::new()
            .route(
                "/acts/karamelo~youtube-transcripts/runs",
                post(|| async {
                    Json(json!({
                        "data": { "status": "SUCCEEDED", "defaultDatasetId": "ds1" }
                    }))
                }),
            )
            .route("/datasets/ds1/items", get(|| async { Json(json!([])) }));
        let base = spawn_stub(app).await;

        let retriever = TranscriptRetriever::new().with_base_url(base);
        let err = retriever
            .retrieve(
                &Client::new(),
                &config_with_token(),
                "https://youtu.be/abc12345678",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CarouselError::ExternalService { .. }));
    }
}
