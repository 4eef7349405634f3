//! Pipeline stage identity and its fixed marker texts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Researches the topic.
    Research,
    /// Turns research into an outline.
    Outline,
    /// Writes the article from the outline.
    Writer,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Outline => write!(f, "outline"),
            Self::Writer => write!(f, "writer"),
        }
    }
}

impl StageKind {
    /// All stages in pipeline order.
    pub const ORDER: [Self; 3] = [Self::Research, Self::Outline, Self::Writer];

    /// Position of the stage in the pipeline, starting at zero.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Research => 0,
            Self::Outline => 1,
            Self::Writer => 2,
        }
    }

    /// Prefix the orchestrator puts in front of a failed stage's message.
    ///
    /// The writer has none: its result is returned unmodified.
    #[must_use]
    pub fn failure_prefix(self) -> Option<&'static str> {
        match self {
            Self::Research => Some("Research failed: "),
            Self::Outline => Some("Outline generation failed: "),
            Self::Writer => None,
        }
    }

    /// Marker announcing that the stage has started streaming.
    #[must_use]
    pub fn started_marker(self) -> &'static str {
        match self {
            Self::Research => "\n\n🔍 Researching topic...\n\n",
            Self::Outline => "\n\n📝 Generating outline...\n\n",
            Self::Writer => "\n\n✍️ Writing blog content...\n\n",
        }
    }

    /// Marker announcing that the stage's stream has ended.
    #[must_use]
    pub fn completed_marker(self) -> &'static str {
        match self {
            Self::Research => "\n\n✅ Research completed\n\n",
            Self::Outline => "\n\n✅ Outline completed\n\n",
            Self::Writer => "\n\n✅ Blog writing completed\n\n",
        }
    }

    /// Terminal marker sent when the stage produced nothing usable.
    #[must_use]
    pub fn failed_marker(self) -> &'static str {
        match self {
            Self::Research => "\n\n❌ Research failed\n\n",
            Self::Outline => "\n\n❌ Outline generation failed\n\n",
            Self::Writer => "\n\n❌ Content writing failed\n\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::Research.to_string(), "research");
        assert_eq!(StageKind::Outline.to_string(), "outline");
        assert_eq!(StageKind::Writer.to_string(), "writer");
    }

    #[test]
    fn test_order_matches_index() {
        for (position, kind) in StageKind::ORDER.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn test_failure_prefixes() {
        assert_eq!(StageKind::Research.failure_prefix(), Some("Research failed: "));
        assert_eq!(
            StageKind::Outline.failure_prefix(),
            Some("Outline generation failed: ")
        );
        assert_eq!(StageKind::Writer.failure_prefix(), None);
    }

    #[test]
    fn test_stage_kind_serialize() {
        let json = serde_json::to_string(&StageKind::Outline).unwrap();
        assert_eq!(json, r#""outline""#);

        let kind: StageKind = serde_json::from_str(r#""writer""#).unwrap();
        assert_eq!(kind, StageKind::Writer);
    }
}
