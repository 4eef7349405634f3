//! Client-side reassembly of an outward stream.
//!
//! Transports differ in how they deliver streamed text. Some forward each
//! newly generated delta, others re-send everything generated so far. A
//! [`StreamReassembler`] turns either regime into non-repeating display
//! pieces and captures the terminal event's content as the full result.

use crate::core::OutwardEvent;
use crate::provider::FragmentMode;
use futures::{Stream, StreamExt};

/// Per-request reassembly state.
#[derive(Debug, Clone, Default)]
pub struct StreamReassembler {
    mode: FragmentMode,
    last_seen: String,
    displayed: String,
    full_content: Option<String>,
}

impl StreamReassembler {
    /// Creates a reassembler for the given fragment regime.
    #[must_use]
    pub fn new(mode: FragmentMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Feeds one event and returns the text to display now, if any.
    ///
    /// The terminal event is never displayed; its content becomes
    /// [`full_content`](Self::full_content). Events after it are ignored.
    pub fn push(&mut self, event: &OutwardEvent) -> Option<String> {
        if self.is_finished() {
            tracing::debug!("Ignoring event after terminal event");
            return None;
        }

        if event.done {
            self.full_content = Some(event.content.clone());
            return None;
        }

        let piece = match self.mode {
            FragmentMode::Incremental => event.content.clone(),
            FragmentMode::Cumulative => {
                let piece = event
                    .content
                    .strip_prefix(self.last_seen.as_str())
                    .unwrap_or(&event.content)
                    .to_string();
                self.last_seen.clone_from(&event.content);
                piece
            }
        };

        if piece.is_empty() {
            return None;
        }
        self.displayed.push_str(&piece);
        Some(piece)
    }

    /// Everything displayed so far.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// The terminal event's content, once it has arrived.
    #[must_use]
    pub fn full_content(&self) -> Option<&str> {
        self.full_content.as_deref()
    }

    /// Returns true once the terminal event has been seen.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.full_content.is_some()
    }

    /// Consumes the reassembler, returning the terminal content.
    #[must_use]
    pub fn into_full_content(self) -> Option<String> {
        self.full_content
    }
}

/// Drains a stream, calling `on_display` for each displayable piece.
///
/// Returns the terminal event's content, or `None` if the stream ended
/// without one.
pub async fn reassemble<S, F>(stream: S, mode: FragmentMode, mut on_display: F) -> Option<String>
where
    S: Stream<Item = OutwardEvent>,
    F: FnMut(&str),
{
    let mut reassembler = StreamReassembler::new(mode);
    futures::pin_mut!(stream);

    while let Some(event) = stream.next().await {
        if let Some(piece) = reassembler.push(&event) {
            on_display(&piece);
        }
        if reassembler.is_finished() {
            break;
        }
    }

    reassembler.into_full_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageKind;
    use pretty_assertions::assert_eq;

    fn text(content: &str) -> OutwardEvent {
        OutwardEvent::fragment(StageKind::Writer, content)
    }

    #[test]
    fn test_cumulative_fragments_are_deduplicated() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Cumulative);

        let pieces: Vec<Option<String>> = ["Hello", "Hello world", "Hello world!"]
            .iter()
            .map(|c| reassembler.push(&text(c)))
            .collect();

        assert_eq!(
            pieces,
            vec![
                Some("Hello".to_string()),
                Some(" world".to_string()),
                Some("!".to_string()),
            ]
        );
        assert_eq!(reassembler.displayed(), "Hello world!");
    }

    #[test]
    fn test_cumulative_repeat_displays_nothing() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Cumulative);
        reassembler.push(&text("abc"));
        assert_eq!(reassembler.push(&text("abc")), None);
    }

    #[test]
    fn test_cumulative_non_extension_is_shown_whole() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Cumulative);
        reassembler.push(&text("Research notes"));
        assert_eq!(
            reassembler.push(&text("\n\n✅ Research completed\n\n")),
            Some("\n\n✅ Research completed\n\n".to_string())
        );
    }

    #[test]
    fn test_incremental_fragments_pass_through() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Incremental);

        for fragment in ["Hel", "lo ", " world"] {
            assert_eq!(reassembler.push(&text(fragment)), Some(fragment.to_string()));
        }
        assert_eq!(reassembler.displayed(), "Hello  world");
    }

    #[test]
    fn test_incremental_repeats_are_not_deduplicated() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Incremental);
        reassembler.push(&text("ha"));
        assert_eq!(reassembler.push(&text("ha")), Some("ha".to_string()));
    }

    #[test]
    fn test_terminal_sets_full_content_and_is_not_displayed() {
        let mut reassembler = StreamReassembler::default();
        reassembler.push(&text("draft"));

        assert_eq!(reassembler.push(&OutwardEvent::terminal("\n\nArticle\n")), None);
        assert!(reassembler.is_finished());
        assert_eq!(reassembler.full_content(), Some("\n\nArticle\n"));
        assert_eq!(reassembler.displayed(), "draft");

        assert_eq!(reassembler.push(&text("late")), None);
        assert_eq!(reassembler.push(&OutwardEvent::terminal("other")), None);
        assert_eq!(reassembler.into_full_content().as_deref(), Some("\n\nArticle\n"));
    }

    #[test]
    fn test_terminal_only_and_empty_terminal() {
        let mut reassembler = StreamReassembler::new(FragmentMode::Cumulative);
        assert_eq!(reassembler.push(&OutwardEvent::terminal("")), None);
        assert!(reassembler.is_finished());
        assert_eq!(reassembler.full_content(), Some(""));
        assert_eq!(reassembler.displayed(), "");
    }

    #[test]
    fn test_unfinished_has_no_full_content() {
        let mut reassembler = StreamReassembler::default();
        reassembler.push(&text("partial"));
        assert!(!reassembler.is_finished());
        assert_eq!(reassembler.full_content(), None);
    }

    #[tokio::test]
    async fn test_reassemble_stream() {
        let events = vec![
            text("Hello"),
            text("Hello world"),
            OutwardEvent::terminal("\n\nHello world\n"),
            text("ignored"),
        ];
        let mut shown = Vec::new();

        let full = reassemble(futures::stream::iter(events), FragmentMode::Cumulative, |p| {
            shown.push(p.to_string());
        })
        .await;

        assert_eq!(shown, vec!["Hello", " world"]);
        assert_eq!(full.as_deref(), Some("\n\nHello world\n"));
    }

    #[tokio::test]
    async fn test_reassemble_without_terminal() {
        let full = reassemble(
            futures::stream::iter(vec![text("a")]),
            FragmentMode::Incremental,
            |_| {},
        )
        .await;
        assert_eq!(full, None);
    }
}
