//! Pipeline orchestration.
//!
//! This module provides:
//! - The three-stage blog pipeline with synchronous and streaming runs
//! - Request-level retry with backoff

mod orchestrator;
pub mod retry;

pub use orchestrator::{BlogPipeline, OutwardStream};
pub use retry::{
    with_retry, BackoffStrategy, JitterStrategy, RetryConfig, RetryDecision, RetryState,
};
