//! Configuration for the text-generation provider.

use crate::errors::BlogflowError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,
    /// Base URL without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Optional cap on generated tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl LlmConfig {
    /// Creates a configuration with defaults and the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Loads the configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_BASE_URL`, `MODEL_NAME`,
    /// `TEMPERATURE` and `REQUEST_TIMEOUT` override the defaults.
    pub fn from_env() -> Result<Self, BlogflowError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BlogflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                BlogflowError::Config("OPENAI_API_KEY environment variable is not set".to_string())
            })?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("MODEL_NAME").filter(|v| !v.is_empty()) {
            config.model = model;
        }
        if let Some(raw) = lookup("TEMPERATURE") {
            config.temperature = raw.trim().parse().map_err(|_| {
                BlogflowError::Config(format!("TEMPERATURE must be a number, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT") {
            config.timeout_seconds = raw.trim().parse().map_err(|_| {
                BlogflowError::Config(format!("REQUEST_TIMEOUT must be a number, got '{raw}'"))
            })?;
        }

        Ok(config)
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the token cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::from_secs(120))
    }

    /// Full chat-completions endpoint URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
