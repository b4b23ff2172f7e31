//! Model fallback: an ordered list of model names tried until one succeeds.
//!
//! Exactly one attempt per model, no backoff. Generative backends vary in
//! availability and quota; a static ordered list gives cheap resilience for
//! a low-QPS tool, and exhausting it is fatal for that call.

use std::sync::Arc;

use reqwest::Client;

use crate::backend::Backend;
use crate::error::{CarouselError, Result};

/// Default model list, strongest-first.
pub const DEFAULT_MODELS: [&str; 3] = [
    "gemini-2.0-flash",
    "gemini-2.5-flash",
    "gemini-2.0-flash-lite",
];

/// Sends a prompt to each model in order and returns the first success.
pub struct ModelInvoker {
    backend: Arc<dyn Backend>,
    models: Vec<String>,
}

impl ModelInvoker {
    /// Create an invoker over `backend` with the default model list.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_models(backend, DEFAULT_MODELS.iter().map(|m| m.to_string()))
    }

    /// Create an invoker with a custom ordered model list.
    pub fn with_models<I, S>(backend: Arc<dyn Backend>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models: Vec<String> = models.into_iter().map(Into::into).collect();
        assert!(!models.is_empty(), "model list must not be empty");
        Self { backend, models }
    }

    /// Try each model in order; return the first non-error response text.
    ///
    /// Fails with [`CarouselError::AllModelsFailed`] when every model in the
    /// list errors (including timeouts and quota errors from the backend).
    pub async fn invoke(&self, client: &Client, prompt: &str) -> Result<String> {
        for model in &self.models {
            tracing::info!(model = %model, backend = self.backend.name(), "trying model");
            match self.backend.complete(client, model, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "model failed, falling back");
                }
            }
        }
        Err(CarouselError::AllModelsFailed {
            tried: self.models.clone(),
        })
    }

    /// The ordered model list this invoker tries.
    pub fn models(&self) -> &[String] {
        &self.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockOutcome};

    #[tokio::test]
    async fn first_model_success_short_circuits() {
        let backend = Arc::new(MockBackend::fixed("ok"));
        let invoker = ModelInvoker::new(backend);
        let client = Client::new();
        assert_eq!(invoker.invoke(&client, "prompt").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn falls_back_past_failures() {
        let backend = Arc::new(MockBackend::new(vec![
            MockOutcome::Fail("quota".into()),
            MockOutcome::Fail("timeout".into()),
            MockOutcome::Text("third time".into()),
        ]));
        let invoker = ModelInvoker::new(backend);
        let client = Client::new();
        assert_eq!(invoker.invoke(&client, "p").await.unwrap(), "third time");
    }

    #[tokio::test]
    async fn exhausted_list_is_distinct_error() {
        let backend = Arc::new(MockBackend::new(vec![MockOutcome::Fail("down".into())]));
        let invoker = ModelInvoker::with_models(backend, ["a", "b"]);
        let client = Client::new();
        let err = invoker.invoke(&client, "p").await.unwrap_err();
        match err {
            CarouselError::AllModelsFailed { tried } => {
                assert_eq!(tried, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected AllModelsFailed, got {other}"),
        }
    }
}
