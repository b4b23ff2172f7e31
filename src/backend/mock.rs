//! Mock backend for testing without a live model.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use super::Backend;
use crate::error::{CarouselError, Result};

/// A test backend that returns scripted outcomes in order.
///
/// Each entry is either a canned response or an error; errors let tests
/// exercise the invoker's model-fallback path. Cycles from the beginning
/// when all outcomes have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    outcomes: Vec<MockOutcome>,
    index: AtomicUsize,
}

/// One scripted result for a [`MockBackend`] call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Text(String),
    /// Fail with an HTTP-style error carrying this message.
    Fail(String),
}

impl MockBackend {
    /// Create a mock with the given scripted outcomes.
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        assert!(!outcomes.is_empty(), "MockBackend requires at least one outcome");
        Self {
            outcomes,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same response text.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![MockOutcome::Text(response.into())])
    }

    /// Create a mock from response texts, returned in order.
    pub fn texts<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            responses
                .into_iter()
                .map(|r| MockOutcome::Text(r.into()))
                .collect(),
        )
    }

    fn next_outcome(&self) -> MockOutcome {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.outcomes.len();
        self.outcomes[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(&self, _client: &Client, _model: &str, _prompt: &str) -> Result<String> {
        match self.next_outcome() {
            MockOutcome::Text(text) => Ok(text),
            MockOutcome::Fail(message) => Err(CarouselError::HttpError {
                status: 503,
                body: message,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let mock = MockBackend::fixed("hello");
        let client = Client::new();
        let text = mock.complete(&client, "m", "p").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn outcomes_in_order_then_cycle() {
        let mock = MockBackend::texts(["first", "second"]);
        let client = Client::new();
        assert_eq!(mock.complete(&client, "m", "p").await.unwrap(), "first");
        assert_eq!(mock.complete(&client, "m", "p").await.unwrap(), "second");
        assert_eq!(mock.complete(&client, "m", "p").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn scripted_failure() {
        let mock = MockBackend::new(vec![MockOutcome::Fail("quota".into())]);
        let client = Client::new();
        let err = mock.complete(&client, "m", "p").await.unwrap_err();
        assert!(matches!(err, CarouselError::HttpError { status: 503, .. }));
    }
}
