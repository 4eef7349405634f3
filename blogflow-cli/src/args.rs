//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Research, outline and write a blog post with an LLM.
#[derive(Debug, Parser)]
#[command(name = "blogflow", version, about)]
pub struct Cli {
    /// Blog topic. Starts an interactive session when omitted.
    pub topic: Option<String>,

    /// Show the writing process as it happens.
    #[arg(short, long)]
    pub stream: bool,

    /// Save the finished post.
    #[arg(long)]
    pub save: bool,

    /// File name for the saved post, without extension.
    #[arg(short, long, requires = "save")]
    pub filename: Option<String>,

    /// Directory for saved posts.
    #[arg(long, default_value = "blogs")]
    pub output_dir: PathBuf,

    /// Attempts per request before giving up.
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// Model name, overriding MODEL_NAME.
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature, overriding TEMPERATURE.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Log filter directive.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["blogflow"]).unwrap();
        assert_eq!(cli.topic, None);
        assert!(!cli.stream);
        assert_eq!(cli.output_dir, PathBuf::from("blogs"));
        assert_eq!(cli.max_retries, 3);
    }

    #[test]
    fn test_one_shot_arguments() {
        let cli = Cli::try_parse_from([
            "blogflow",
            "space travel",
            "--stream",
            "--save",
            "--filename",
            "space",
            "--temperature",
            "0.2",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("space travel"));
        assert!(cli.stream);
        assert_eq!(cli.filename.as_deref(), Some("space"));
        assert_eq!(cli.temperature, Some(0.2));
    }

    #[test]
    fn test_filename_requires_save() {
        assert!(Cli::try_parse_from(["blogflow", "topic", "--filename", "x"]).is_err());
    }
}
