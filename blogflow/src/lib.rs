//! # Blogflow
//!
//! A three-stage blog content pipeline over a text-generation provider.
//!
//! A topic goes through Research, Outline and Writer stages; each stage's
//! output is the next stage's input. Blogflow provides:
//!
//! - **Stage agents**: one prompt template per stage over a shared provider
//! - **Synchronous runs**: the final article or a stage-labelled failure
//! - **Streaming runs**: progress markers and raw text with exactly one
//!   terminal event
//! - **Stream reassembly**: client-side display for incremental or
//!   cumulative transports
//! - **Injected observability**: event sinks passed in at construction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blogflow::prelude::*;
//! use std::sync::Arc;
//!
//! let generator = OpenAiGenerator::new(LlmConfig::from_env()?)?;
//! let pipeline = BlogPipeline::from_generator(Arc::new(generator));
//!
//! let result = pipeline.invoke("space travel").await;
//! println!("{}", result.content);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod pipeline;
pub mod provider;
pub mod reassembler;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::LlmConfig;
    pub use crate::core::{EventKind, OutwardEvent, PipelineResult, StageChunk, StageKind, StageResult};
    pub use crate::errors::{BlogflowError, GenerationError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::helpers::{save_blog_post, BlogMetadata};
    pub use crate::pipeline::{with_retry, BlogPipeline, OutwardStream, RetryConfig};
    #[cfg(feature = "openai")]
    pub use crate::provider::OpenAiGenerator;
    pub use crate::provider::{FragmentMode, FragmentStream, TextGenerator};
    pub use crate::reassembler::{reassemble, StreamReassembler};
    pub use crate::stages::{default_stages, Stage, StageAgent, StageDescriptor};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
