//! Text helpers for finished articles.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Name used when nothing usable is left after sanitizing.
pub const DEFAULT_BLOG_NAME: &str = "blog_post";

const DEFAULT_TITLE: &str = "Blog Post";
const DEFAULT_SUMMARY: &str = "A blog post about various topics.";

/// Summary length used in [`BlogMetadata`].
const SUMMARY_LENGTH: usize = 200;

#[allow(clippy::expect_used)]
static INVALID_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid filename pattern"));

#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,2}\s+(.+)$").expect("valid heading pattern"));

/// Replaces characters that are invalid in file names.
///
/// Leading and trailing spaces and dots are removed. Returns
/// [`DEFAULT_BLOG_NAME`] when nothing is left.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let replaced = INVALID_FILENAME_CHARS.replace_all(name, "_");
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        DEFAULT_BLOG_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns the first `#` or `##` heading, else the first non-blank line.
#[must_use]
pub fn extract_blog_title(content: &str) -> String {
    if let Some(captures) = HEADING.captures(content) {
        return captures[1].trim_end().to_string();
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// Descriptive data about a generated article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogMetadata {
    /// Topic the article was generated for.
    pub topic: String,
    /// Title extracted from the article.
    pub title: String,
    /// Whitespace-separated word count.
    pub word_count: usize,
    /// Opening paragraph, shortened.
    pub summary: String,
    /// When the metadata was created.
    pub created_at: DateTime<Utc>,
}

/// Builds metadata for an article.
#[must_use]
pub fn format_blog_metadata(topic: &str, content: &str) -> BlogMetadata {
    BlogMetadata {
        topic: topic.to_string(),
        title: extract_blog_title(content),
        word_count: content.split_whitespace().count(),
        summary: create_blog_summary(content, SUMMARY_LENGTH),
        created_at: Utc::now(),
    }
}

/// Returns the first paragraph after a leading heading, without `#`
/// characters, truncated to `max_length` characters plus `...`.
#[must_use]
pub fn create_blog_summary(content: &str, max_length: usize) -> String {
    let paragraphs: Vec<&str> = content.split("\n\n").collect();
    let start = usize::from(paragraphs.first().is_some_and(|p| p.starts_with('#')));

    let Some(paragraph) = paragraphs.get(start) else {
        return DEFAULT_SUMMARY.to_string();
    };

    let cleaned = paragraph.replace('#', "");
    let cleaned = cleaned.trim();
    if cleaned.chars().count() > max_length {
        let truncated: String = cleaned.chars().take(max_length).collect();
        format!("{truncated}...")
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my: post?"), "my_ post_");
        assert_eq!(sanitize_filename("a/b\\c*d<e>f|g\"h"), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_filename("  .hidden. "), "hidden");
        assert_eq!(sanitize_filename(" .. "), DEFAULT_BLOG_NAME);
        assert_eq!(sanitize_filename(""), DEFAULT_BLOG_NAME);
    }

    #[test]
    fn test_extract_blog_title() {
        assert_eq!(extract_blog_title("intro\n# Space Travel\nbody"), "Space Travel");
        assert_eq!(extract_blog_title("## Sub Title\n\ntext"), "Sub Title");
        assert_eq!(extract_blog_title("\n\n  First line  \nsecond"), "First line");
        assert_eq!(extract_blog_title("   \n"), "Blog Post");
    }

    #[test]
    fn test_extract_blog_title_ignores_deeper_headings() {
        assert_eq!(extract_blog_title("### Deep\n# Top"), "Top");
    }

    #[test]
    fn test_format_blog_metadata() {
        let metadata = format_blog_metadata("space", "# Space Travel\n\nTo the stars we go.");
        assert_eq!(metadata.topic, "space");
        assert_eq!(metadata.title, "Space Travel");
        assert_eq!(metadata.word_count, 8);
        assert_eq!(metadata.summary, "To the stars we go.");
    }

    #[test]
    fn test_create_blog_summary() {
        let content = "# Title\n\nThe ## first paragraph.\n\nSecond.";
        assert_eq!(create_blog_summary(content, 200), "The  first paragraph.");
        assert_eq!(create_blog_summary(content, 3), "The...");
        assert_eq!(create_blog_summary("Plain start\n\nMore", 200), "Plain start");
        assert_eq!(create_blog_summary("# Only a title", 200), DEFAULT_SUMMARY);
    }
}
