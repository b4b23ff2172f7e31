//! Backend for the Google Generative Language REST API.
//!
//! Translates a prompt into `models/{model}:generateContent` and pulls the
//! completion text out of `candidates[0].content.parts[0].text`.

use super::Backend;
use crate::error::{CarouselError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Backend for Gemini models via the Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend authenticating with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used by tests to point at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        })
    }

    fn extract_text(response: &Value) -> Option<&str> {
        response
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn complete(&self, client: &Client, model: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );

        let resp = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(prompt))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CarouselError::HttpError { status, body });
        }

        let json_resp: Value = resp.json().await?;
        match Self::extract_text(&json_resp) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(CarouselError::ExternalService {
                service: "gemini",
                message: format!("model {model} returned no text"),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_wraps_prompt_in_parts() {
        let body = GeminiBackend::build_body("Why is the sky blue?");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Why is the sky blue?");
    }

    #[test]
    fn extracts_candidate_text() {
        let resp = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[]" }] }
            }]
        });
        assert_eq!(GeminiBackend::extract_text(&resp), Some("[]"));
    }

    #[test]
    fn missing_candidates_is_none() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(GeminiBackend::extract_text(&resp), None);
    }

    #[test]
    fn base_url_override_keeps_path_shape() {
        let backend = GeminiBackend::new("key").with_base_url("http://localhost:9999/");
        assert_eq!(backend.base_url, "http://localhost:9999/");
    }

    #[tokio::test]
    async fn completes_against_stub_server() {
        use axum::routing::post;
        use axum::{Json, Router};

        let app = Router::new().route(
            "/models/gemini-2.0-flash:generateContent",
            post(|| async {
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let backend = GeminiBackend::new("key").with_base_url(format!("http://{addr}"));
        let text = backend
            .complete(&Client::new(), "gemini-2.0-flash", "say hello")
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }
}
