//! HTTP surface: three pipeline endpoints plus a health check.
//!
//! Every component error is translated at this boundary into a JSON
//! `{error}` body with the status from the error taxonomy; nothing is
//! retried here.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::GeminiBackend;
use crate::config::Config;
use crate::error::CarouselError;
use crate::invoker::ModelInvoker;
use crate::render::SlideRenderer;
use crate::synthesizer::{Synthesizer, SLIDE_COUNT_RANGE};
use crate::transcript::{is_youtube_url, TranscriptRetriever};
use crate::types::Slide;

/// Shared application state passed to the handlers.
pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
    pub retriever: TranscriptRetriever,
    pub renderer: SlideRenderer,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let renderer = SlideRenderer::new(&config);
        Self {
            config,
            client: reqwest::Client::new(),
            retriever: TranscriptRetriever::new(),
            renderer,
        }
    }

    /// Build a synthesizer over the configured Gemini key.
    ///
    /// Constructed per call so a missing key fails at first use with a
    /// configuration error, not at startup.
    fn synthesizer(&self) -> crate::error::Result<Synthesizer> {
        let key = self.config.gemini_key()?;
        let backend = Arc::new(GeminiBackend::new(key));
        Ok(Synthesizer::new(ModelInvoker::new(backend)))
    }
}

/// Build the router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/transcript", post(transcript))
        .route("/generate", post(generate))
        .route("/generate-images", post(generate_images))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

impl IntoResponse for CarouselError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct TranscriptRequest {
    url: String,
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Result<Response, CarouselError> {
    if req.url.trim().is_empty() {
        return Err(CarouselError::Validation("url is required".into()));
    }
    if !is_youtube_url(&req.url) {
        return Err(CarouselError::Validation("not a valid YouTube URL".into()));
    }

    let result = state
        .retriever
        .retrieve(&state.client, &state.config, &req.url)
        .await?;
    Ok(Json(result).into_response())
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    transcript: String,
    #[serde(rename = "slideCount", default = "default_slide_count")]
    slide_count: u32,
    #[serde(default)]
    title: String,
}

fn default_slide_count() -> u32 {
    7
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, CarouselError> {
    if req.transcript.trim().is_empty() {
        return Err(CarouselError::Validation("transcript is required".into()));
    }

    let synthesizer = state.synthesizer()?;
    let slides = synthesizer
        .synthesize_slides(&state.client, &req.transcript, req.slide_count, &req.title)
        .await?;
    let caption = synthesizer
        .synthesize_caption(&state.client, &req.title, &slides)
        .await?;

    Ok(Json(json!({ "slides": slides, "caption": caption })).into_response())
}

#[derive(Debug, Deserialize)]
struct GenerateImagesRequest {
    slides: Vec<Slide>,
    #[serde(default)]
    title: String,
    #[serde(rename = "thumbnailUrl", default)]
    thumbnail_url: String,
}

async fn generate_images(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateImagesRequest>,
) -> Result<Response, CarouselError> {
    if req.slides.is_empty() {
        return Err(CarouselError::Validation("slides are required".into()));
    }
    // Same ceiling as /generate; also keeps the two-digit image names sortable
    let max = *SLIDE_COUNT_RANGE.end() as usize;
    if req.slides.len() > max {
        return Err(CarouselError::Validation(format!(
            "too many slides: {} (max {max})",
            req.slides.len()
        )));
    }

    let images = state
        .renderer
        .render_all(&state.client, &req.slides, &req.title, &req.thumbnail_url)
        .await?;
    Ok(Json(json!({ "images": images })).into_response())
}
