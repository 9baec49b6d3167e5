//! Configuration types for npm-downloads.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a fetch run.
///
/// All fields have serde defaults, so a partial JSON document (or an empty
/// `{}`) deserializes into a usable configuration. `Default` mirrors the
/// serde defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the line-oriented registry dump to read names from
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Path to the append-only checkpoint/output file
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Batch size, maximum parallel per-name requests, and bulk per-request
    /// cap (default: 128, the statistics API's documented bulk limit)
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Wait before retrying a rate-limited request (default: 600 seconds)
    #[serde(default = "default_backoff", with = "duration_serde")]
    pub backoff: Duration,

    /// Base URL of the registry statistics API
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            concurrency_limit: default_concurrency_limit(),
            backoff: default_backoff(),
            registry_url: default_registry_url(),
        }
    }
}

impl Config {
    /// Check the configuration for values that would break the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(Error::config(
                "concurrency_limit must be at least 1",
                "concurrency_limit",
            ));
        }
        if self.registry_url.is_empty() {
            return Err(Error::config(
                "registry_url must not be empty",
                "registry_url",
            ));
        }
        if url::Url::parse(&self.registry_url).is_err() {
            return Err(Error::config(
                format!("registry_url is not a valid URL: {}", self.registry_url),
                "registry_url",
            ));
        }
        Ok(())
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("data/all-packages.ndjson")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/npm-downloads.csv")
}

fn default_concurrency_limit() -> usize {
    128
}

fn default_backoff() -> Duration {
    Duration::from_secs(600)
}

fn default_registry_url() -> String {
    "https://api.npmjs.org".to_string()
}

// Duration serialization helper (seconds as integer)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
