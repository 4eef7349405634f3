//! Stage trait and the LLM-backed stage agents.
//!
//! A stage turns one named input string into generated text, either as a
//! single [`StageResult`] or as a stream of [`StageChunk`]s.

mod agent;
mod prompts;

pub use agent::{StageAgent, GENERATION_FAILED};
pub use prompts::StageDescriptor;

use crate::core::{StageChunk, StageKind, StageResult};
use crate::events::EventSink;
use crate::provider::TextGenerator;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;
use std::sync::Arc;

/// A stage's streaming output.
///
/// Finite; exactly one chunk has `done` set and it is the last.
pub type StageStream = BoxStream<'static, StageChunk>;

/// One step of the pipeline.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Which pipeline step this stage implements.
    fn kind(&self) -> StageKind;

    /// Runs the stage to completion. Never fails; failures are encoded in
    /// the result.
    async fn process(&self, input: &str) -> StageResult;

    /// Runs the stage as a lazy stream. Nothing happens until it is polled.
    fn stream_process(&self, input: &str) -> StageStream;
}

/// Builds the three stage agents in pipeline order over one generator.
pub fn default_stages(
    generator: Arc<dyn TextGenerator>,
    sink: Arc<dyn EventSink>,
) -> Vec<Arc<dyn Stage>> {
    StageDescriptor::pipeline()
        .into_iter()
        .map(|descriptor| {
            Arc::new(StageAgent::with_event_sink(
                descriptor,
                Arc::clone(&generator),
                Arc::clone(&sink),
            )) as Arc<dyn Stage>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::noop_sink;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_default_stages_order() {
        let stages = default_stages(Arc::new(ScriptedGenerator::new()), noop_sink());
        let kinds: Vec<_> = stages.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, StageKind::ORDER.to_vec());
    }
}
