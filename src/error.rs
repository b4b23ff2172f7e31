use crate::output_parser::ParseError;
use thiserror::Error;

/// Errors produced by the carousel pipeline and its components.
#[derive(Error, Debug)]
pub enum CarouselError {
    /// Malformed or missing required input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// A required credential or setting is missing. Raised at first use.
    #[error("configuration error: {0}")]
    Config(String),

    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON handling failed at the serde level.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external service (transcript extractor, model backend, renderer)
    /// reported failure or timed out.
    #[error("{service}: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    /// HTTP error with status code and response body, as returned by a
    /// [`Backend`](crate::backend::Backend) on a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Every model in the fallback list failed. Surfaced distinctly so the
    /// caller knows fallback was exhausted, not that a single call failed.
    #[error("all models failed: tried {tried:?}")]
    AllModelsFailed { tried: Vec<String> },

    /// The model responded, but no structure could be recovered from the text.
    #[error("could not understand the model response: {0}")]
    Parse(#[from] ParseError),

    /// The model returned parseable JSON of the wrong shape.
    #[error("unexpected model output: {0}")]
    InvalidModelOutput(String),

    /// The browser renderer failed.
    #[error("render failed: {0}")]
    Render(String),
}

impl CarouselError {
    /// HTTP status the router should respond with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CarouselError::Validation(_) => 400,
            CarouselError::Config(_) | CarouselError::Render(_) => 500,
            CarouselError::ExternalService { .. }
            | CarouselError::HttpError { .. }
            | CarouselError::AllModelsFailed { .. }
            | CarouselError::Parse(_)
            | CarouselError::InvalidModelOutput(_) => 502,
            CarouselError::Request(_) | CarouselError::Json(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, CarouselError>;
