//! The blog pipeline: Research, then Outline, then Writer.

use crate::core::{OutwardEvent, PipelineResult, StageKind, StageResult};
use crate::errors::BlogflowError;
use crate::events::{self, EventSink};
use crate::provider::TextGenerator;
use crate::stages::{default_stages, Stage, StageDescriptor};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// The outward stream produced by [`BlogPipeline::stream`].
///
/// Finite; exactly one event has `done` set and it is the last.
pub type OutwardStream = BoxStream<'static, OutwardEvent>;

/// Sequences the three stages, feeding each stage's output into the next.
///
/// Holds no per-run state, so one pipeline can serve concurrent requests.
#[derive(Clone)]
pub struct BlogPipeline {
    stages: Vec<Arc<dyn Stage>>,
    generator: Option<Arc<dyn TextGenerator>>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for BlogPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogPipeline")
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl BlogPipeline {
    /// Creates a pipeline from explicit stages.
    ///
    /// # Errors
    ///
    /// Returns [`BlogflowError::InvalidPipeline`] unless exactly the three
    /// stages are given in Research, Outline, Writer order.
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Result<Self, BlogflowError> {
        let kinds: Vec<StageKind> = stages.iter().map(|s| s.kind()).collect();
        if kinds != StageKind::ORDER {
            return Err(BlogflowError::InvalidPipeline(format!(
                "expected stages {:?}, got {:?}",
                StageKind::ORDER,
                kinds
            )));
        }

        Ok(Self {
            stages,
            generator: None,
            sink: events::noop_sink(),
        })
    }

    /// Creates the standard pipeline over one text generator.
    #[must_use]
    pub fn from_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            stages: default_stages(Arc::clone(&generator), events::noop_sink()),
            generator: Some(generator),
            sink: events::noop_sink(),
        }
    }

    /// Sets the sink that receives pipeline and stage events.
    ///
    /// On a pipeline built with [`BlogPipeline::from_generator`] the stage
    /// agents are rebuilt so their events reach the same sink. Stages given
    /// to [`BlogPipeline::new`] keep the sinks they were built with.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        if let Some(generator) = &self.generator {
            self.stages = default_stages(Arc::clone(generator), Arc::clone(&sink));
        }
        self.sink = sink;
        self
    }

    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Arc<dyn Stage>] {
        &self.stages
    }

    /// Runs all stages to completion and returns the article.
    ///
    /// Stops at the first failing stage; later stages are not run. Research
    /// and outline failures are prefixed with the stage label, a writer
    /// failure is returned as the writer reported it.
    pub async fn invoke(&self, topic: &str) -> PipelineResult {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        tracing::info!(run_id = %run_id, topic = %topic, "Starting blog pipeline");
        self.sink.try_emit(
            events::PIPELINE_STARTED,
            Some(serde_json::json!({"run_id": run_id, "topic": topic, "streaming": false})),
        );

        let mut input = topic.to_string();
        for stage in &self.stages {
            let kind = stage.kind();
            let stage_started = Instant::now();
            self.sink
                .try_emit(events::STAGE_STARTED, Some(events::stage_payload(&run_id, kind)));

            let mut result = stage.process(&input).await;
            let duration_ms = stage_started.elapsed().as_secs_f64() * 1000.0;
            if result.success && result.content.trim().is_empty() {
                result = StageResult::failed(format!(
                    "{}: empty response",
                    StageDescriptor::for_kind(kind).error_label
                ));
            }

            if !result.success {
                tracing::warn!(run_id = %run_id, stage = %kind, error = %result.content, "Stage failed");
                self.sink.try_emit(
                    events::STAGE_FAILED,
                    Some(events::with_field(
                        events::with_field(events::stage_payload(&run_id, kind), "error", result.content.as_str()),
                        "duration_ms",
                        duration_ms,
                    )),
                );
                let content = match kind.failure_prefix() {
                    Some(prefix) => format!("{prefix}{}", result.content),
                    None => result.content,
                };
                self.sink.try_emit(
                    events::PIPELINE_FAILED,
                    Some(serde_json::json!({"run_id": run_id, "stage": kind.to_string()})),
                );
                return PipelineResult::failed(content);
            }

            tracing::debug!(run_id = %run_id, stage = %kind, duration_ms, "Stage completed");
            self.sink.try_emit(
                events::STAGE_COMPLETED,
                Some(events::with_field(events::stage_payload(&run_id, kind), "duration_ms", duration_ms)),
            );
            input = result.content;
        }

        tracing::info!(
            run_id = %run_id,
            article_chars = input.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Blog pipeline completed"
        );
        self.sink.try_emit(
            events::PIPELINE_COMPLETED,
            Some(serde_json::json!({"run_id": run_id, "article_chars": input.len()})),
        );
        PipelineResult::ok(input)
    }

    /// Runs the pipeline as a stream of progress markers and raw text.
    ///
    /// Nothing runs until the stream is polled. Dropping the stream stops
    /// the stage (and provider) stream currently being read.
    #[must_use]
    pub fn stream(&self, topic: &str) -> OutwardStream {
        let stages = self.stages.clone();
        let sink = Arc::clone(&self.sink);
        let topic = topic.to_string();

        let stream = async_stream::stream! {
            let run_id = Uuid::new_v4().to_string();
            tracing::info!(run_id = %run_id, topic = %topic, "Starting streaming blog pipeline");
            sink.try_emit(
                events::PIPELINE_STARTED,
                Some(serde_json::json!({"run_id": run_id, "topic": topic, "streaming": true})),
            );

            let mut input = topic;
            for stage in stages {
                let kind = stage.kind();
                sink.try_emit(events::STAGE_STARTED, Some(events::stage_payload(&run_id, kind)));
                yield OutwardEvent::started(kind);

                let mut buffer = String::new();
                let mut chunks = stage.stream_process(&input);
                while let Some(chunk) = chunks.next().await {
                    if chunk.done {
                        if !chunk.content.is_empty() {
                            tracing::warn!(run_id = %run_id, stage = %kind, error = %chunk.content, "Stage stream reported an error");
                            sink.try_emit(
                                events::STAGE_FAILED,
                                Some(events::with_field(
                                    events::stage_payload(&run_id, kind),
                                    "error",
                                    chunk.content.as_str(),
                                )),
                            );
                        }
                        break;
                    }
                    buffer.push_str(&chunk.content);
                    yield OutwardEvent::text(kind, chunk.content);
                }
                drop(chunks);
                yield OutwardEvent::completed(kind);

                if buffer.trim().is_empty() {
                    tracing::warn!(run_id = %run_id, stage = %kind, "Stage produced no content");
                    sink.try_emit(
                        events::PIPELINE_FAILED,
                        Some(serde_json::json!({"run_id": run_id, "stage": kind.to_string()})),
                    );
                    yield OutwardEvent::failed(kind);
                    return;
                }

                sink.try_emit(
                    events::STAGE_COMPLETED,
                    Some(events::with_field(events::stage_payload(&run_id, kind), "chars", buffer.len())),
                );
                input = if kind == StageKind::Writer {
                    buffer
                } else {
                    buffer.trim().to_string()
                };
            }

            tracing::info!(run_id = %run_id, article_chars = input.len(), "Streaming blog pipeline completed");
            sink.try_emit(
                events::PIPELINE_COMPLETED,
                Some(serde_json::json!({"run_id": run_id, "article_chars": input.len()})),
            );
            yield OutwardEvent::article(&input);
        };

        Box::pin(stream)
    }
}
