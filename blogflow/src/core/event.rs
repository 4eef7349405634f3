//! Streaming elements: stage chunks and outward pipeline events.

use super::StageKind;
use serde::{Deserialize, Serialize};

/// One element of a stage's streaming output.
///
/// A stage stream is finite and ends with exactly one chunk whose `done`
/// flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChunk {
    /// Text fragment, empty end marker, or error text on a terminal chunk.
    pub content: String,
    /// Set on the last chunk only.
    pub done: bool,
}

impl StageChunk {
    /// A non-terminal fragment of generated text.
    #[must_use]
    pub fn fragment(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    /// The empty terminal chunk.
    #[must_use]
    pub fn end() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }

    /// A terminal chunk carrying an error description.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            done: true,
        }
    }
}

/// What an outward event's content represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "stage", rename_all = "snake_case")]
pub enum EventKind {
    /// A stage began streaming.
    StageStarted(StageKind),
    /// A stage's stream ended.
    StageCompleted(StageKind),
    /// Raw generated text from a stage.
    Text(StageKind),
    /// Terminal event carrying the whole article.
    Article,
    /// Terminal event reporting that a stage produced nothing.
    Failed(StageKind),
}

impl EventKind {
    /// Returns true for stage-transition markers.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::StageStarted(_) | Self::StageCompleted(_))
    }
}

/// One element of the orchestrator's outward stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutwardEvent {
    /// Text to relay to the client.
    pub content: String,
    /// Set on the last event of the stream only.
    pub done: bool,
    /// Annotation describing the content.
    pub kind: EventKind,
}

impl OutwardEvent {
    pub(crate) fn started(stage: StageKind) -> Self {
        Self {
            content: stage.started_marker().to_string(),
            done: false,
            kind: EventKind::StageStarted(stage),
        }
    }

    pub(crate) fn completed(stage: StageKind) -> Self {
        Self {
            content: stage.completed_marker().to_string(),
            done: false,
            kind: EventKind::StageCompleted(stage),
        }
    }

    pub(crate) fn text(stage: StageKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
            kind: EventKind::Text(stage),
        }
    }

    pub(crate) fn failed(stage: StageKind) -> Self {
        Self {
            content: stage.failed_marker().to_string(),
            done: true,
            kind: EventKind::Failed(stage),
        }
    }

    pub(crate) fn article(article: &str) -> Self {
        Self {
            content: format!("\n\n{article}\n"),
            done: true,
            kind: EventKind::Article,
        }
    }

    /// Builds a non-terminal text event, as a transport would deliver it.
    #[must_use]
    pub fn fragment(stage: StageKind, content: impl Into<String>) -> Self {
        Self::text(stage, content)
    }

    /// Builds a terminal event with arbitrary content.
    #[must_use]
    pub fn terminal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: true,
            kind: EventKind::Article,
        }
    }

    /// Returns true if this event reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, EventKind::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_chunk_constructors() {
        assert!(!StageChunk::fragment("x").done);
        assert_eq!(StageChunk::end(), StageChunk { content: String::new(), done: true });
        let err = StageChunk::error("Error writing content: boom");
        assert!(err.done);
        assert_eq!(err.content, "Error writing content: boom");
    }

    #[test]
    fn test_marker_events_are_not_terminal() {
        let started = OutwardEvent::started(StageKind::Research);
        assert!(!started.done);
        assert!(started.kind.is_marker());
        assert_eq!(started.content, "\n\n🔍 Researching topic...\n\n");

        let completed = OutwardEvent::completed(StageKind::Outline);
        assert!(!completed.done);
        assert!(completed.kind.is_marker());
    }

    #[test]
    fn test_article_event_wraps_content() {
        let event = OutwardEvent::article("Body");
        assert!(event.done);
        assert!(!event.is_failure());
        assert_eq!(event.content, "\n\nBody\n");
    }

    #[test]
    fn test_failed_event_is_terminal() {
        let event = OutwardEvent::failed(StageKind::Writer);
        assert!(event.done);
        assert!(event.is_failure());
        assert_eq!(event.content, "\n\n❌ Content writing failed\n\n");
    }

    #[test]
    fn test_event_kind_serialization() {
        let json = serde_json::to_value(EventKind::Text(StageKind::Research)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "stage": "research"}));

        let json = serde_json::to_value(EventKind::Article).unwrap();
        assert_eq!(json, serde_json::json!({"type": "article"}));
    }
}
