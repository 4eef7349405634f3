//! Fake stages for orchestrator tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{StageChunk, StageKind, StageResult};
use crate::stages::{Stage, StageStream};

/// A stage with scripted output that records how it was called.
#[derive(Debug)]
pub struct FakeStage {
    kind: StageKind,
    result: StageResult,
    chunks: Vec<StageChunk>,
    process_inputs: Mutex<Vec<String>>,
    stream_inputs: Mutex<Vec<String>>,
}

impl FakeStage {
    /// Creates a stage that succeeds with `text` on both paths.
    ///
    /// The streaming path yields `text` as one fragment followed by the end
    /// marker.
    #[must_use]
    pub fn succeeding(kind: StageKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            result: StageResult::ok(text.clone()),
            chunks: vec![StageChunk::fragment(text), StageChunk::end()],
            process_inputs: Mutex::new(Vec::new()),
            stream_inputs: Mutex::new(Vec::new()),
        }
    }

    /// Creates a stage that fails with `message` on both paths.
    #[must_use]
    pub fn failing(kind: StageKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            result: StageResult::failed(message.clone()),
            chunks: vec![StageChunk::error(message)],
            process_inputs: Mutex::new(Vec::new()),
            stream_inputs: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the scripted stream.
    #[must_use]
    pub fn with_chunks(mut self, chunks: Vec<StageChunk>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Number of `process` calls.
    #[must_use]
    pub fn process_calls(&self) -> usize {
        self.process_inputs.lock().len()
    }

    /// Number of `stream_process` calls.
    #[must_use]
    pub fn stream_calls(&self) -> usize {
        self.stream_inputs.lock().len()
    }

    /// Inputs received by `process`, in order.
    #[must_use]
    pub fn process_inputs(&self) -> Vec<String> {
        self.process_inputs.lock().clone()
    }

    /// Inputs received by `stream_process`, in order.
    #[must_use]
    pub fn stream_inputs(&self) -> Vec<String> {
        self.stream_inputs.lock().clone()
    }
}

#[async_trait]
impl Stage for FakeStage {
    fn kind(&self) -> StageKind {
        self.kind
    }

    async fn process(&self, input: &str) -> StageResult {
        self.process_inputs.lock().push(input.to_string());
        self.result.clone()
    }

    fn stream_process(&self, input: &str) -> StageStream {
        self.stream_inputs.lock().push(input.to_string());
        Box::pin(futures::stream::iter(self.chunks.clone()))
    }
}
