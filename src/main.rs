//! CLI entry point for npm-downloads.

use clap::Parser;
use npm_downloads::{Config, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Resumable bulk fetcher for weekly npm download counts.
#[derive(Parser, Debug)]
#[command(
    name = "npm-downloads",
    version,
    about = "Fetch weekly download counts for every package in a registry dump",
    long_about = "Reads package names from a line-oriented registry dump, fetches each name's\n\
                  weekly download count from the statistics API, and appends results to an\n\
                  append-only checkpoint file.\n\n\
                  The checkpoint doubles as resume state: rerunning with the same output file\n\
                  skips every name already recorded, so interrupting a run is always safe."
)]
struct CliArgs {
    /// Line-oriented registry dump to read package names from
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Append-only output/checkpoint file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Batch size, parallel request cap, and bulk per-request limit
    #[arg(short = 'k', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Seconds to wait before retrying a rate-limited request
    #[arg(long, value_name = "SECONDS")]
    backoff: Option<u64>,

    /// Base URL of the registry statistics API
    #[arg(long, value_name = "URL")]
    registry_url: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl CliArgs {
    fn into_config(self) -> npm_downloads::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            None => Config::default(),
        };
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency_limit = concurrency;
        }
        if let Some(backoff) = self.backoff {
            config.backoff = Duration::from_secs(backoff);
        }
        if let Some(registry_url) = self.registry_url {
            config.registry_url = registry_url;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&config).await {
        Ok(summary) => {
            tracing::info!(
                fetched = summary.fetched,
                skipped = summary.skipped,
                total = summary.total,
                "all packages persisted"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "run aborted; the checkpoint is valid up to the last completed batch"
            );
            ExitCode::FAILURE
        }
    }
}
