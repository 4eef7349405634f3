//! Helpers for finished articles: titles, metadata, summaries and saving to
//! disk.

mod blog;
mod persist;

pub use blog::{
    create_blog_summary, extract_blog_title, format_blog_metadata,
    sanitize_filename, BlogMetadata, DEFAULT_BLOG_NAME,
};
pub use persist::{save_blog_post, BLOG_FILE_EXTENSION};
