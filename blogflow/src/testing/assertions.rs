//! Assertions for pipeline results and outward streams.

use crate::core::{OutwardEvent, PipelineResult};

/// Asserts the single-terminal invariant: exactly one event has `done` set
/// and it is the last one.
pub fn assert_single_terminal(events: &[OutwardEvent]) {
    let terminal: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.done)
        .map(|(i, _)| i)
        .collect();

    assert_eq!(
        terminal.len(),
        1,
        "Expected exactly one terminal event, found {} in {:?}",
        terminal.len(),
        events
    );
    assert_eq!(
        terminal[0],
        events.len() - 1,
        "Terminal event is at position {} of {}",
        terminal[0],
        events.len()
    );
}

/// Asserts that the pipeline succeeded with non-empty content.
pub fn assert_pipeline_succeeded(result: &PipelineResult) {
    assert!(
        result.success,
        "Expected success, got failure: {}",
        result.content
    );
    assert!(
        !result.content.is_empty(),
        "Successful pipeline result has empty content"
    );
}

/// Asserts that the pipeline failed with exactly the given message.
pub fn assert_pipeline_failed_with(result: &PipelineResult, expected: &str) {
    assert!(
        !result.success,
        "Expected failure, got success: {}",
        result.content
    );
    assert_eq!(result.content, expected);
}

/// Concatenates the content of all non-terminal events.
#[must_use]
pub fn streamed_text(events: &[OutwardEvent]) -> String {
    events
        .iter()
        .filter(|e| !e.done)
        .map(|e| e.content.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageKind;

    #[test]
    fn test_single_terminal_accepts_valid_sequence() {
        let events = vec![
            OutwardEvent::fragment(StageKind::Research, "a"),
            OutwardEvent::terminal("done"),
        ];
        assert_single_terminal(&events);
        assert_eq!(streamed_text(&events), "a");
    }

    #[test]
    #[should_panic(expected = "Expected exactly one terminal event")]
    fn test_single_terminal_rejects_two() {
        assert_single_terminal(&[OutwardEvent::terminal("a"), OutwardEvent::terminal("b")]);
    }

    #[test]
    #[should_panic(expected = "Terminal event is at position 0")]
    fn test_single_terminal_rejects_early_terminal() {
        assert_single_terminal(&[
            OutwardEvent::terminal("a"),
            OutwardEvent::fragment(StageKind::Writer, "late"),
        ]);
    }

    #[test]
    fn test_pipeline_assertions() {
        assert_pipeline_succeeded(&PipelineResult::ok("article"));
        assert_pipeline_failed_with(&PipelineResult::failed("Research failed: x"), "Research failed: x");
    }
}
