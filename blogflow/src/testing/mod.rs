//! Testing utilities for blogflow pipelines.
//!
//! This module provides:
//! - A scripted text generator with call recording
//! - Fake stages for orchestrator tests
//! - Assertions for results and outward streams

mod assertions;
mod generator;
mod mocks;

pub use assertions::{
    assert_pipeline_failed_with, assert_pipeline_succeeded, assert_single_terminal,
    streamed_text,
};
pub use generator::{stage_marker, Reply, ScriptedGenerator};
pub use mocks::FakeStage;
