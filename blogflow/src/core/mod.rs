//! Core data model for blogflow.
//!
//! This module contains the types that flow between components:
//! - Stage identity and marker texts
//! - Synchronous stage and pipeline results
//! - Stage chunks and outward stream events

mod event;
mod output;
mod status;

pub use event::{EventKind, OutwardEvent, StageChunk};
pub use output::{PipelineResult, StageResult};
pub use status::StageKind;
