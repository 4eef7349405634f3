//! Error types for the blogflow pipeline.
//!
//! Generation failures are recovered at the stage boundary and never reach
//! callers of the orchestrator. `BlogflowError` covers construction and
//! client-side concerns (configuration, persistence, retry loops).

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for blogflow operations.
#[derive(Debug, Error)]
pub enum BlogflowError {
    /// The capability client failed outside a stage boundary.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// The pipeline was assembled with the wrong stages.
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// A pipeline run finished with a failure result.
    #[error("{0}")]
    StageFailed(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a text-generation provider.
///
/// The `Display` output is the bare message; stage agents prepend their own
/// label when converting this into a failed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or provider message.
        message: String,
    },

    /// The provider rejected the call because of rate limiting.
    #[error("rate limited")]
    RateLimited,

    /// The call exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider response could not be decoded.
    #[error("malformed response: {0}")]
    Parse(String),

    /// The provider is missing credentials or settings.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Any other provider-side failure.
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    /// Creates a generic generation error from a message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Returns true if retrying the same call might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited | Self::Timeout | Self::Request(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::NotConfigured(_) | Self::Other(_) => false,
        }
    }

    /// Converts to a dictionary representation for event payloads.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        let kind = match self {
            Self::Request(_) => "Request",
            Self::Api { .. } => "Api",
            Self::RateLimited => "RateLimited",
            Self::Timeout => "Timeout",
            Self::Parse(_) => "Parse",
            Self::NotConfigured(_) => "NotConfigured",
            Self::Other(_) => "Other",
        };
        map.insert("type".to_string(), serde_json::json!(kind));
        if let Self::Api { status, .. } = self {
            map.insert("status".to_string(), serde_json::json!(status));
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("transient".to_string(), serde_json::json!(self.is_transient()));
        map
    }
}

#[cfg(feature = "openai")]
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_displays_bare_message() {
        let err = GenerationError::other("rate limited");
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_api_error_display() {
        let err = GenerationError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned 503: overloaded");
        assert!(err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(GenerationError::RateLimited.is_transient());
        assert!(GenerationError::Timeout.is_transient());
        assert!(!GenerationError::Parse("bad json".into()).is_transient());
        assert!(!GenerationError::Api { status: 400, message: String::new() }.is_transient());
    }

    #[test]
    fn test_generation_error_to_dict() {
        let dict = GenerationError::Api {
            status: 429,
            message: "slow down".to_string(),
        }
        .to_dict();

        assert_eq!(dict.get("type").unwrap(), "Api");
        assert_eq!(dict.get("status").unwrap(), 429);
        assert_eq!(dict.get("transient").unwrap(), false);
    }

    #[test]
    fn test_blogflow_error_from_generation() {
        let err: BlogflowError = GenerationError::Timeout.into();
        assert_eq!(err.to_string(), "request timed out");
    }

    #[test]
    fn test_stage_failed_display_is_verbatim() {
        let err = BlogflowError::StageFailed("Research failed: boom".to_string());
        assert_eq!(err.to_string(), "Research failed: boom");
    }
}
