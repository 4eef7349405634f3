//! Saving articles to disk.

use super::blog::{sanitize_filename, DEFAULT_BLOG_NAME};
use crate::errors::BlogflowError;
use std::path::{Path, PathBuf};

/// Extension given to saved articles.
pub const BLOG_FILE_EXTENSION: &str = ".md";

/// Writes an article into `dir` and returns the path written.
///
/// The directory is created if missing. `filename` defaults to
/// `blog_post`, is sanitized, and gets the `.md` extension if it lacks it.
/// Existing files are never overwritten: `name_1.md`, `name_2.md`, ... are
/// tried in turn. Content is written verbatim.
pub fn save_blog_post(
    dir: impl AsRef<Path>,
    content: &str,
    filename: Option<&str>,
) -> Result<PathBuf, BlogflowError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let requested = filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BLOG_NAME);
    let sanitized = sanitize_filename(requested);
    let stem = sanitized
        .strip_suffix(BLOG_FILE_EXTENSION)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(sanitized.as_str());

    let mut path = dir.join(format!("{stem}{BLOG_FILE_EXTENSION}"));
    let mut counter = 1usize;
    while path.exists() {
        path = dir.join(format!("{stem}_{counter}{BLOG_FILE_EXTENSION}"));
        counter += 1;
    }

    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "Blog post saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_adds_extension_and_writes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_blog_post(dir.path(), "\n\n# Title\n", Some("space")).unwrap();

        assert_eq!(path, dir.path().join("space.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\n\n# Title\n");
    }

    #[test]
    fn test_save_keeps_existing_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_blog_post(dir.path(), "x", Some("notes.md")).unwrap();
        assert_eq!(path, dir.path().join("notes.md"));
    }

    #[test]
    fn test_save_defaults_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            save_blog_post(dir.path(), "x", None).unwrap(),
            dir.path().join("blog_post.md")
        );
        assert_eq!(
            save_blog_post(dir.path(), "y", Some("   ")).unwrap(),
            dir.path().join("blog_post_1.md")
        );
    }

    #[test]
    fn test_save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_blog_post(dir.path(), "one", Some("post")).unwrap();
        let second = save_blog_post(dir.path(), "two", Some("post")).unwrap();
        let third = save_blog_post(dir.path(), "three", Some("post.md")).unwrap();

        assert_eq!(first, dir.path().join("post.md"));
        assert_eq!(second, dir.path().join("post_1.md"));
        assert_eq!(third, dir.path().join("post_2.md"));
        assert_eq!(std::fs::read_to_string(first).unwrap(), "one");
    }

    #[test]
    fn test_save_sanitizes_and_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("blogs");
        let path = save_blog_post(&nested, "x", Some("a/b?")).unwrap();

        assert_eq!(path, nested.join("a_b_.md"));
        assert!(path.exists());
    }
}
