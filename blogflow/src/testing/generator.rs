//! A scripted text generator.

use crate::core::StageKind;
use crate::errors::GenerationError;
use crate::provider::{FragmentMode, FragmentStream, TextGenerator};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// What the generator answers for one call.
#[derive(Debug, Clone)]
pub enum Reply {
    /// One text; streamed as a single fragment.
    Text(String),
    /// A list of incremental fragments; `generate` returns their concatenation.
    Fragments(Vec<String>),
    /// Fails when the call is made.
    Fail(GenerationError),
    /// Streams the fragments, then fails. `generate` fails outright.
    FailAfter(Vec<String>, GenerationError),
}

impl Reply {
    /// Shorthand for [`Reply::Text`].
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Shorthand for [`Reply::Fragments`].
    #[must_use]
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }

    /// Shorthand for [`Reply::Fail`] with a plain message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(GenerationError::other(message))
    }
}

/// Text that only appears in the given stage's prompt template.
#[must_use]
pub fn stage_marker(kind: StageKind) -> &'static str {
    match kind {
        StageKind::Research => "blog topic research agent",
        StageKind::Outline => "blog outline generator",
        StageKind::Writer => "blog content writer",
    }
}

/// A [`TextGenerator`] that answers from a script and records every call.
///
/// Replies are chosen by the first rule whose pattern occurs in the prompt,
/// then from a queue in call order. With neither, the call fails.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    rules: Vec<(String, Reply)>,
    queue: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    mode: FragmentMode,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers prompts containing `pattern` with `reply`.
    #[must_use]
    pub fn on(mut self, pattern: impl Into<String>, reply: Reply) -> Self {
        self.rules.push((pattern.into(), reply));
        self
    }

    /// Answers the prompts of one stage with `reply`.
    #[must_use]
    pub fn on_stage(self, kind: StageKind, reply: Reply) -> Self {
        self.on(stage_marker(kind), reply)
    }

    /// Queues a reply for the next unmatched call.
    #[must_use]
    pub fn then(self, reply: Reply) -> Self {
        self.queue.lock().push_back(reply);
        self
    }

    /// Streams running totals instead of deltas.
    #[must_use]
    pub fn cumulative(mut self) -> Self {
        self.mode = FragmentMode::Cumulative;
        self
    }

    /// Number of calls made so far, streaming or not.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Number of calls whose prompt belonged to the given stage.
    #[must_use]
    pub fn stage_calls(&self, kind: StageKind) -> usize {
        let marker = stage_marker(kind);
        self.prompts.lock().iter().filter(|p| p.contains(marker)).count()
    }

    /// All prompts received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn next_reply(&self, prompt: &str) -> Reply {
        self.prompts.lock().push(prompt.to_string());

        if let Some((_, reply)) = self.rules.iter().find(|(p, _)| prompt.contains(p.as_str())) {
            return reply.clone();
        }
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Reply::fail("no scripted reply"))
    }

    fn shape(&self, fragments: Vec<String>) -> Vec<String> {
        match self.mode {
            FragmentMode::Incremental => fragments,
            FragmentMode::Cumulative => {
                let mut total = String::new();
                fragments
                    .into_iter()
                    .map(|fragment| {
                        total.push_str(&fragment);
                        total.clone()
                    })
                    .collect()
            }
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self.next_reply(prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Fragments(fragments) => Ok(fragments.concat()),
            Reply::Fail(error) | Reply::FailAfter(_, error) => Err(error),
        }
    }

    async fn generate_streaming(&self, prompt: &str) -> Result<FragmentStream, GenerationError> {
        let items: Vec<Result<String, GenerationError>> = match self.next_reply(prompt) {
            Reply::Text(text) => vec![Ok(text)],
            Reply::Fragments(fragments) => self.shape(fragments).into_iter().map(Ok).collect(),
            Reply::Fail(error) => return Err(error),
            Reply::FailAfter(fragments, error) => self
                .shape(fragments)
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn fragment_mode(&self) -> FragmentMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_rules_take_precedence_over_queue() {
        let generator = ScriptedGenerator::new()
            .on("alpha", Reply::text("A"))
            .then(Reply::text("queued"));

        assert_eq!(generator.generate("the alpha prompt").await.unwrap(), "A");
        assert_eq!(generator.generate("other").await.unwrap(), "queued");
        assert!(generator.generate("other").await.is_err());
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_cumulative_shaping() {
        let generator = ScriptedGenerator::new()
            .then(Reply::fragments(["Hello", " world", "!"]))
            .cumulative();

        let fragments: Vec<String> = generator
            .generate_streaming("p")
            .await
            .unwrap()
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(fragments, vec!["Hello", "Hello world", "Hello world!"]);
        assert_eq!(generator.fragment_mode(), FragmentMode::Cumulative);
    }

    #[tokio::test]
    async fn test_fail_after_streams_then_errors() {
        let generator = ScriptedGenerator::new().then(Reply::FailAfter(
            vec!["part".to_string()],
            GenerationError::Timeout,
        ));

        let items: Vec<_> = generator.generate_streaming("p").await.unwrap().collect().await;
        assert_eq!(items, vec![Ok("part".to_string()), Err(GenerationError::Timeout)]);
    }
}
