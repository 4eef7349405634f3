//! Incremental decoder for chat-completion server-sent events.

use crate::errors::GenerationError;
use serde::Deserialize;

/// A decoded server-sent event relevant to text generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A delta of generated text.
    Delta(String),
    /// The `[DONE]` sentinel.
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamPayload {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// Splits a byte stream into SSE lines and decodes `data:` payloads.
///
/// Network chunks may end mid-line (or mid-character); incomplete input is
/// held back until its newline arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a network chunk and returns the events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<SseEvent, GenerationError>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = decode_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Decodes whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Vec<Result<SseEvent, GenerationError>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }
}

fn decode_line(line: &str) -> Option<Result<SseEvent, GenerationError>> {
    let data = line.trim_end_matches(['\r', '\n']).strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        return Some(Ok(SseEvent::Done));
    }

    let payload: StreamPayload = match serde_json::from_str(data) {
        Ok(payload) => payload,
        Err(e) => return Some(Err(GenerationError::Parse(e.to_string()))),
    };

    if let Some(error) = payload.error {
        return Some(Err(GenerationError::Other(error.message)));
    }

    let text = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .unwrap_or_default();

    Some(Ok(SseEvent::Delta(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn delta(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    #[test]
    fn test_decodes_deltas_and_done() {
        let mut decoder = SseDecoder::new();
        let input = format!("{}{}data: [DONE]\n\n", delta("Hel"), delta("lo"));

        let events: Vec<_> = decoder
            .feed(input.as_bytes())
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(
            events,
            vec![
                SseEvent::Delta("Hel".to_string()),
                SseEvent::Delta("lo".to_string()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let line = delta("world");
        let (first, second) = line.as_bytes().split_at(10);

        assert!(decoder.feed(first).is_empty());
        let events = decoder.feed(second);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &SseEvent::Delta("world".to_string()));
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let line = delta("café");
        let bytes = line.as_bytes();
        let split = line.find('é').unwrap() + 1;

        assert!(decoder.feed(&bytes[..split]).is_empty());
        let events = decoder.feed(&bytes[split..]);
        assert_eq!(events[0].as_ref().unwrap(), &SseEvent::Delta("café".to_string()));
    }

    #[test]
    fn test_ignores_comments_and_blank_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b": keep-alive\n\nevent: ping\n").is_empty());
    }

    #[test]
    fn test_role_only_delta_is_empty_text() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n");
        assert_eq!(events[0].as_ref().unwrap(), &SseEvent::Delta(String::new()));
    }

    #[test]
    fn test_error_payload() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"error\":{\"message\":\"rate limited\"}}\n");
        assert_eq!(
            events[0].clone().unwrap_err(),
            GenerationError::Other("rate limited".to_string())
        );
    }

    #[test]
    fn test_malformed_payload() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {not json\n");
        assert!(matches!(events[0], Err(GenerationError::Parse(_))));
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), vec![Ok(SseEvent::Done)]);
        assert!(decoder.finish().is_empty());
    }
}
