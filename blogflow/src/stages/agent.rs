//! The stage agent: one descriptor bound to a text generator.

use super::{Stage, StageDescriptor, StageStream};
use crate::core::{StageChunk, StageKind, StageResult};
use crate::errors::GenerationError;
use crate::events::{self, EventSink};
use crate::provider::{FragmentMode, TextGenerator};
use async_trait::async_trait;
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Event emitted when the capability client fails inside a stage.
pub const GENERATION_FAILED: &str = "generation.failed";

/// Turns one input string into generated text through a fixed template.
///
/// Generation failures never escape: the synchronous path returns a failed
/// [`StageResult`] and the streaming path ends with an error chunk.
pub struct StageAgent {
    descriptor: StageDescriptor,
    generator: Arc<dyn TextGenerator>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for StageAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageAgent")
            .field("kind", &self.descriptor.kind)
            .field("input_field", &self.descriptor.input_field)
            .finish_non_exhaustive()
    }
}

impl StageAgent {
    /// Creates an agent that reports nothing beyond `tracing`.
    #[must_use]
    pub fn new(descriptor: StageDescriptor, generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_event_sink(descriptor, generator, events::noop_sink())
    }

    /// Creates an agent that also reports generation failures to a sink.
    #[must_use]
    pub fn with_event_sink(
        descriptor: StageDescriptor,
        generator: Arc<dyn TextGenerator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        tracing::debug!(stage = %descriptor.kind, "Stage agent initialized");
        Self {
            descriptor,
            generator,
            sink,
        }
    }

    /// Returns the descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "generator panicked".to_string())
}

fn report_failure(
    sink: &dyn EventSink,
    descriptor: &StageDescriptor,
    error: &GenerationError,
    streaming: bool,
) -> String {
    tracing::error!(stage = %descriptor.kind, streaming, error = %error, "Generation failed");
    sink.try_emit(
        GENERATION_FAILED,
        Some(serde_json::json!({
            "stage": descriptor.kind.to_string(),
            "streaming": streaming,
            "error": error.to_dict(),
        })),
    );
    descriptor.error_message(error)
}

#[async_trait]
impl Stage for StageAgent {
    fn kind(&self) -> StageKind {
        self.descriptor.kind
    }

    async fn process(&self, input: &str) -> StageResult {
        let kind = self.descriptor.kind;
        tracing::info!(stage = %kind, input_chars = input.len(), "Running stage");

        let prompt = self.descriptor.render(input);
        let outcome = AssertUnwindSafe(async { self.generator.generate(&prompt).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(GenerationError::Other(panic_message(payload.as_ref()))));

        match outcome {
            Ok(text) => {
                tracing::info!(stage = %kind, output_chars = text.len(), "Stage completed");
                StageResult::ok(text)
            }
            Err(e) => StageResult::failed(report_failure(
                self.sink.as_ref(),
                &self.descriptor,
                &e,
                false,
            )),
        }
    }

    fn stream_process(&self, input: &str) -> StageStream {
        let descriptor = self.descriptor;
        let prompt = descriptor.render(input);
        let generator = Arc::clone(&self.generator);
        let sink = Arc::clone(&self.sink);

        let stream = async_stream::stream! {
            tracing::info!(stage = %descriptor.kind, "Streaming stage");

            let opened = AssertUnwindSafe(async { generator.generate_streaming(&prompt).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(GenerationError::Other(panic_message(payload.as_ref()))));

            let mut fragments = match opened {
                Ok(fragments) => fragments,
                Err(e) => {
                    yield StageChunk::error(report_failure(sink.as_ref(), &descriptor, &e, true));
                    return;
                }
            };

            let cumulative = generator.fragment_mode() == FragmentMode::Cumulative;
            let mut total = String::new();
            let mut relayed = 0usize;
            loop {
                let next = AssertUnwindSafe(fragments.next())
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        Some(Err(GenerationError::Other(panic_message(payload.as_ref()))))
                    });

                match next {
                    Some(Ok(text)) => {
                        let delta = if cumulative {
                            let delta = text.strip_prefix(total.as_str()).unwrap_or(&text).to_string();
                            total = text;
                            delta
                        } else {
                            text
                        };
                        if !delta.is_empty() {
                            relayed += 1;
                            yield StageChunk::fragment(delta);
                        }
                    }
                    Some(Err(e)) => {
                        yield StageChunk::error(report_failure(sink.as_ref(), &descriptor, &e, true));
                        return;
                    }
                    None => break,
                }
            }

            tracing::info!(stage = %descriptor.kind, fragments = relayed, "Stage streaming completed");
            yield StageChunk::end();
        };

        Box::pin(stream)
    }
}
