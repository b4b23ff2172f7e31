//! Environment-based configuration.
//!
//! Values are read once at startup, but missing credentials only fail at
//! the point of first use so that endpoints which don't need them keep
//! working (e.g. rendering without a Gemini key).

use crate::error::{CarouselError, Result};

/// Runtime configuration, sourced from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Google Generative Language API key (`GEMINI_API_KEY`).
    pub gemini_api_key: Option<String>,
    /// Apify API token (`APIFY_API_KEY`).
    pub apify_api_key: Option<String>,
    /// HTTP listen port (`PORT`, default 3000).
    pub port: u16,
    /// Optional path to the Chrome binary (`CHROME_BIN`).
    pub chrome_bin: Option<String>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty(std::env::var("GEMINI_API_KEY").ok()),
            apify_api_key: non_empty(std::env::var("APIFY_API_KEY").ok()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            chrome_bin: non_empty(std::env::var("CHROME_BIN").ok()),
        }
    }

    /// The Gemini key, or a descriptive configuration error.
    pub fn gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| CarouselError::Config("GEMINI_API_KEY is not set".into()))
    }

    /// The Apify token, or a descriptive configuration error.
    pub fn apify_token(&self) -> Result<&str> {
        self.apify_api_key
            .as_deref()
            .ok_or_else(|| CarouselError::Config("APIFY_API_KEY is not set".into()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fail_at_use() {
        let config = Config {
            port: 3000,
            ..Default::default()
        };
        assert!(config.gemini_key().is_err());
        assert!(config.apify_token().is_err());
    }

    #[test]
    fn present_keys_returned() {
        let config = Config {
            gemini_api_key: Some("g-key".into()),
            apify_api_key: Some("a-key".into()),
            port: 3000,
            chrome_bin: None,
        };
        assert_eq!(config.gemini_key().unwrap(), "g-key");
        assert_eq!(config.apify_token().unwrap(), "a-key");
    }

    #[test]
    fn empty_string_treated_as_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
    }
}
