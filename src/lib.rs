//! # npm-downloads
//!
//! Resumable, rate-limited bulk fetcher for weekly npm download counts.
//!
//! Reads package names out of a huge line-oriented registry dump, fetches
//! each name's weekly download count from the registry's statistics API, and
//! appends the results to an append-only checkpoint file. The checkpoint is
//! simultaneously the result set and the resume state: a rerun skips every
//! name already recorded, so an interrupted run loses at most one batch of
//! work.
//!
//! ## Design Philosophy
//!
//! - **Crash-safe by construction** - a batch is durably appended before the
//!   next one starts; killing the process is always safe
//! - **Patient with the API** - rate limits wait a fixed interval and retry
//!   forever; transport hiccups retry immediately
//! - **Memory-bounded** - the dump is streamed, never loaded
//!
//! ## Quick Start
//!
//! ```no_run
//! use npm_downloads::{Config, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         input_path: "data/all-packages.ndjson".into(),
//!         output_path: "data/npm-downloads.csv".into(),
//!         ..Default::default()
//!     };
//!
//!     let summary = pipeline::run(&config).await?;
//!     println!(
//!         "fetched {} packages ({} already done)",
//!         summary.fetched, summary.skipped
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Durable checkpoint appending
pub mod appender;
/// Scoped/unscoped partitioning
pub mod classify;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Statistics API client
pub mod fetcher;
/// The batch fetch pipeline
pub mod pipeline;
/// Resume set construction from the checkpoint
pub mod resume;
/// Retry policy shared by both fetch paths
pub mod retry;
/// Dump reading and name extraction
pub mod source;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use fetcher::DownloadsClient;
pub use pipeline::{RunSummary, run};
pub use types::{OutputRecord, PackageName};
