//! Observability events emitted by stages and the pipeline.
//!
//! Every component receives its sink through its constructor; there is no
//! process-wide sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::core::StageKind;
use std::sync::Arc;

/// A pipeline run began.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// A pipeline run produced an article.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
/// A pipeline run short-circuited.
pub const PIPELINE_FAILED: &str = "pipeline.failed";
/// A stage began.
pub const STAGE_STARTED: &str = "stage.started";
/// A stage finished successfully.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// A stage failed.
pub const STAGE_FAILED: &str = "stage.failed";

/// Returns the default sink.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpEventSink)
}

/// Builds the payload shared by all stage events.
pub(crate) fn stage_payload(run_id: &str, stage: StageKind) -> serde_json::Value {
    serde_json::json!({
        "run_id": run_id,
        "stage": stage.to_string(),
    })
}

/// Adds a key to an object payload.
pub(crate) fn with_field(
    mut payload: serde_json::Value,
    key: &str,
    value: impl Into<serde_json::Value>,
) -> serde_json::Value {
    if let Some(map) = payload.as_object_mut() {
        map.insert(key.to_string(), value.into());
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_payload() {
        let payload = with_field(stage_payload("run-1", StageKind::Outline), "duration_ms", 12.5);
        assert_eq!(payload["run_id"], "run-1");
        assert_eq!(payload["stage"], "outline");
        assert_eq!(payload["duration_ms"], 12.5);
    }

    #[test]
    fn test_noop_sink_is_usable() {
        noop_sink().try_emit(PIPELINE_STARTED, None);
    }
}
