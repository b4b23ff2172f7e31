//! # yt-carousel
//!
//! Turns a YouTube video transcript into a ready-to-post Instagram
//! carousel: a cover image, a sequence of styled slide images, and a
//! caption with hashtags.
//!
//! The crate is a thin orchestration layer over three external services:
//!
//! - a transcript-extraction actor ([`transcript`])
//! - a generative-language API with model fallback ([`backend`], [`invoker`])
//! - a headless-browser renderer ([`render`])
//!
//! The only unit with real branching logic is [`output_parser`], which
//! recovers structure from malformed model JSON with an ordered chain of
//! progressively more permissive strategies.
//!
//! ## Pipeline
//!
//! ```text
//! URL ──► TranscriptRetriever ──► transcript text
//!     ──► Synthesizer (slides prompt, caption prompt) ──► Slide[] + Caption
//!     ──► SlideRenderer (cover + one PNG per slide) ──► RenderedImage[]
//! ```
//!
//! Everything is transient request/response state; the one piece of
//! process-lifetime state is the lazily-created browser handle owned by
//! [`render::SlideRenderer`].

pub mod backend;
pub mod config;
pub mod error;
pub mod invoker;
pub mod output_parser;
pub mod render;
pub mod server;
pub mod synthesizer;
pub mod transcript;
pub mod types;

pub use config::Config;
pub use error::{CarouselError, Result};
pub use invoker::ModelInvoker;
pub use output_parser::{parse_value, ParseError};
pub use render::SlideRenderer;
pub use server::{build_router, AppState};
pub use synthesizer::Synthesizer;
pub use transcript::TranscriptRetriever;
pub use types::{Caption, RenderedImage, Slide, TranscriptResult};
