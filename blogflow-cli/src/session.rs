//! Running requests and the interactive loop.

use anyhow::{Context, Result};
use blogflow::errors::BlogflowError;
use blogflow::helpers::{format_blog_metadata, save_blog_post};
use blogflow::pipeline::{with_retry, BlogPipeline, RetryConfig};
use blogflow::provider::FragmentMode;
use blogflow::reassembler::StreamReassembler;
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub const WELCOME_MESSAGE: &str = "
=================================================
🖋️  Blogflow - research, outline, write
=================================================

Three stages work on every post:

1. Research: analyses the topic and its key points
2. Outline: structures the post
3. Writer: writes the complete post

Enter a topic and the pipeline does the rest.
";

const TOPIC_PROMPT: &str = "\nEnter the blog topic you'd like to write about:\n> ";
const STREAMING_PROMPT: &str = "\nWould you like to see the writing process in real-time? (y/n)\n> ";
const SWITCH_PROMPT: &str = "Would you like to switch to streaming mode? (y/n)\n> ";
const SAVE_PROMPT: &str = "\nWould you like to save this blog post to a file? (y/n)\n> ";
const FILENAME_PROMPT: &str = "\nEnter the filename (without extension):\n> ";
const CONTINUE_PROMPT: &str = "\nWould you like to write another blog post? (y/n)\n> ";
const GOODBYE_MESSAGE: &str = "\nThank you for using Blogflow!\nGoodbye! 👋\n";

/// Topics with more words than this suggest streaming.
const COMPLEX_TOPIC_WORDS: usize = 5;

/// Returns true for answers starting with `y`.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with('y')
}

/// Returns true if the topic is long enough to recommend streaming.
pub fn is_complex_topic(topic: &str) -> bool {
    topic.split_whitespace().count() > COMPLEX_TOPIC_WORDS
}

/// Streams one pipeline run to `out` and returns the final article.
///
/// A failure terminal event becomes [`BlogflowError::StageFailed`].
pub async fn stream_article<W: Write>(
    pipeline: &BlogPipeline,
    topic: &str,
    out: &mut W,
) -> Result<String, BlogflowError> {
    let mut reassembler = StreamReassembler::new(FragmentMode::Incremental);
    let mut events = pipeline.stream(topic);
    let mut failure = None;

    while let Some(event) = events.next().await {
        if let Some(piece) = reassembler.push(&event) {
            write!(out, "{piece}")?;
            out.flush()?;
        }
        if event.done {
            if event.is_failure() {
                failure = Some(event.content.trim().to_string());
            }
            break;
        }
    }

    if let Some(message) = failure {
        return Err(BlogflowError::StageFailed(message));
    }
    reassembler
        .into_full_content()
        .ok_or_else(|| BlogflowError::StageFailed("stream ended without a result".to_string()))
}

/// One configured pipeline plus request settings.
pub struct Session {
    pipeline: BlogPipeline,
    retry: RetryConfig,
    output_dir: PathBuf,
}

impl Session {
    pub fn new(pipeline: BlogPipeline, retry: RetryConfig, output_dir: PathBuf) -> Self {
        Self {
            pipeline,
            retry,
            output_dir,
        }
    }

    /// Generates a post, retrying failed runs.
    pub async fn generate(&self, topic: &str, streaming: bool) -> Result<String, BlogflowError> {
        let on_retry = |_: usize, delay: std::time::Duration, error: &BlogflowError| {
            println!("\nRequest failed: {error}. Retrying in {} seconds...", delay.as_secs());
        };

        if streaming {
            with_retry(
                &self.retry,
                "stream",
                || async move {
                    println!("\n--- Writing your blog post (streaming) ---\n");
                    let article = stream_article(&self.pipeline, topic, &mut std::io::stdout()).await?;
                    println!("\n\n--- Blog post completed ---\n");
                    Ok::<_, BlogflowError>(article)
                },
                on_retry,
            )
            .await
        } else {
            println!("\nGenerating your blog post. This may take a minute or two...\n");
            with_retry(
                &self.retry,
                "invoke",
                || async move { self.pipeline.invoke(topic).await.into_result() },
                on_retry,
            )
            .await
        }
    }

    /// Saves a post and prints where it went.
    pub fn save(&self, topic: &str, article: &str, filename: Option<&str>) -> Result<PathBuf> {
        let path = save_blog_post(&self.output_dir, article, filename)
            .with_context(|| format!("failed to save blog post in {}", self.output_dir.display()))?;
        let metadata = format_blog_metadata(topic, article);
        println!(
            "\nBlog post \"{}\" ({} words) saved to: {}\nSummary: {}\n",
            metadata.title,
            metadata.word_count,
            path.display(),
            metadata.summary
        );
        Ok(path)
    }

    /// Generates one post, prints it and optionally saves it.
    pub async fn run_once(
        &self,
        topic: &str,
        streaming: bool,
        save: bool,
        filename: Option<&str>,
    ) -> Result<()> {
        let article = self
            .generate(topic, streaming)
            .await
            .with_context(|| format!("failed to write a blog post about '{topic}'"))?;
        println!("{article}");
        if save {
            self.save(topic, &article, filename)?;
        }
        Ok(())
    }

    /// Asks for topics until the user stops or input ends.
    pub async fn interactive(&self) -> Result<()> {
        println!("{WELCOME_MESSAGE}");
        let mut prompter = Prompter::new();

        loop {
            let Some(topic) = prompter.ask(TOPIC_PROMPT).await? else {
                break;
            };
            if topic.is_empty() {
                println!("Topic cannot be empty. Please try again.");
                continue;
            }

            let mut streaming = prompter.confirm(STREAMING_PROMPT).await?;
            if is_complex_topic(&topic) {
                println!(
                    "\nThis seems like a complex topic. Streaming mode is recommended for better experience."
                );
                if !streaming {
                    streaming = prompter.confirm(SWITCH_PROMPT).await?;
                }
            }

            match self.generate(&topic, streaming).await {
                Ok(article) => {
                    println!("{article}");
                    if prompter.confirm(SAVE_PROMPT).await? {
                        let filename = prompter.ask(FILENAME_PROMPT).await?;
                        if let Err(e) = self.save(&topic, &article, filename.as_deref()) {
                            tracing::error!(error = %e, "Saving failed");
                            println!("\nFailed to save the blog post: {e:#}\n");
                        }
                    }
                }
                Err(e) => println!("\nError: failed to get a blog post after multiple attempts. {e}\n"),
            }

            if !prompter.confirm(CONTINUE_PROMPT).await? {
                break;
            }
        }

        println!("{GOODBYE_MESSAGE}");
        Ok(())
    }
}

struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Returns the trimmed answer, or `None` at end of input.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let line = self.lines.next_line().await.context("failed to read input")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    async fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt).await?.is_some_and(|answer| is_yes(&answer)))
    }
}
