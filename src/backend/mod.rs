//! Backend trait for generative-text providers.
//!
//! [`Backend`] abstracts the provider HTTP API behind a single completion
//! call so the invoker's fallback loop and the synthesizer can be tested
//! against a scripted mock. Built-in implementations: [`GeminiBackend`],
//! [`MockBackend`].

pub mod gemini;
pub mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Abstraction over generative-text providers.
///
/// Implementors translate a plain prompt into the provider's HTTP API and
/// return the raw response text. Object-safe by design — held as
/// `Arc<dyn Backend>` by the invoker.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute one completion against the named model. Exactly one attempt;
    /// fallback across models is the invoker's job.
    async fn complete(&self, client: &Client, model: &str, prompt: &str) -> Result<String>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
