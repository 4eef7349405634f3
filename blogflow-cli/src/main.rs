//! Blogflow CLI - main entry point.
//!
//! With a topic argument, writes one post and exits. Without one, starts an
//! interactive session.

use anyhow::{Context, Result};
use blogflow::config::LlmConfig;
use blogflow::events::{EventSink, LoggingEventSink};
use blogflow::pipeline::{BlogPipeline, RetryConfig};
use blogflow::provider::OpenAiGenerator;
use blogflow::stages::default_stages;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod session;

use args::Cli;
use session::Session;

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log level '{}'", cli.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    result.context("failed to initialize logging")
}

fn load_config(cli: &Cli) -> Result<LlmConfig> {
    let mut config = LlmConfig::from_env().context("failed to load provider configuration")?;
    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }
    if let Some(temperature) = cli.temperature {
        config = config.with_temperature(temperature);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    tracing::info!(model = %config.model, temperature = config.temperature, "Starting blogflow");

    let generator = OpenAiGenerator::new(config).context("failed to create the provider client")?;
    let sink: Arc<dyn EventSink> = Arc::new(LoggingEventSink::debug());
    let pipeline = BlogPipeline::new(default_stages(Arc::new(generator), Arc::clone(&sink)))?
        .with_event_sink(sink);
    let retry = RetryConfig::new().with_max_attempts(cli.max_retries);
    let session = Session::new(pipeline, retry, cli.output_dir.clone());

    match cli.topic.as_deref().map(str::trim) {
        Some(topic) if !topic.is_empty() => {
            session
                .run_once(topic, cli.stream, cli.save, cli.filename.as_deref())
                .await
        }
        Some(_) => anyhow::bail!("topic cannot be empty"),
        None => session.interactive().await,
    }
}
