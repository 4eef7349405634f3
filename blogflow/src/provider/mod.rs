//! Capability client: the black-box text-generation provider.
//!
//! Stages only see the [`TextGenerator`] trait. A prompt goes in; either a
//! final text or a lazy, finite, non-restartable stream of fragments comes
//! out.

#[cfg(feature = "openai")]
mod openai;
mod sse;

#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;
pub use sse::{SseDecoder, SseEvent};

use crate::errors::GenerationError;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A stream of generated text fragments.
///
/// An `Err` item is a mid-stream failure; consumers stop pulling after it.
/// The end of the stream is the end marker.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send>>;

/// How the fragments of a stream relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentMode {
    /// Each fragment is only the newly generated delta.
    #[default]
    Incremental,
    /// Each fragment is the full text generated so far.
    Cumulative,
}

/// A text-generation capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates the complete text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Opens a streaming generation for a prompt.
    async fn generate_streaming(&self, prompt: &str) -> Result<FragmentStream, GenerationError>;

    /// Fragment regime of [`TextGenerator::generate_streaming`].
    fn fragment_mode(&self) -> FragmentMode {
        FragmentMode::Incremental
    }
}
