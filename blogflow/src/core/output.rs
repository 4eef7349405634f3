//! Synchronous results produced by stages and by the pipeline.

use serde::{Deserialize, Serialize};

/// Result of a stage's non-streaming path.
///
/// When `success` is false, `content` holds a human-readable error
/// description rather than generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Generated text, or the error description on failure.
    pub content: String,
    /// Whether generation succeeded.
    pub success: bool,
}

impl StageResult {
    /// Creates a successful result.
    #[must_use]
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Creates a failed result carrying an error description.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            success: false,
        }
    }

    /// Returns true if the stage succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Final outcome of a non-streaming pipeline run.
///
/// Holds the article on success or a stage-labelled failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The article, or the failure explanation.
    pub content: String,
    /// Whether every stage succeeded.
    pub success: bool,
}

impl PipelineResult {
    /// Creates a successful pipeline result.
    #[must_use]
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Creates a failed pipeline result.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            success: false,
        }
    }

    /// Converts a failed result into an error, keeping successes as content.
    pub fn into_result(self) -> Result<String, crate::errors::BlogflowError> {
        if self.success {
            Ok(self.content)
        } else {
            Err(crate::errors::BlogflowError::StageFailed(self.content))
        }
    }
}

impl From<StageResult> for PipelineResult {
    fn from(result: StageResult) -> Self {
        Self {
            content: result.content,
            success: result.success,
        }
    }
}
