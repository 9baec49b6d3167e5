//! Retry policy shared by both fetch paths.
//!
//! Two failure classes are recoverable and handled identically everywhere:
//! rate limiting (HTTP 429) waits a fixed, configurable interval and then
//! repeats the exact same request; transport failures repeat the request
//! immediately. Neither class has an attempt cap: the workload is large,
//! long-running, and checkpointed externally, so the run is resumable no
//! matter how long a stall lasts. There is no exponential backoff and no
//! jitter. Every other failure is fatal and aborts the operation.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Why a single fetch attempt did not produce a result.
#[derive(Debug)]
pub enum FetchFailure {
    /// HTTP 429: wait the fixed interval, then repeat the same request
    RateLimited,
    /// Connection-level failure: repeat the same request with no delay
    Transport(reqwest::Error),
    /// Not covered by the retry policy; aborts the whole operation
    Fatal(Error),
}

/// Drive `operation` until it succeeds or fails fatally.
///
/// The retry loop is explicit (not recursive) so indefinite retries cannot
/// grow the call stack; its only suspension point besides the operation
/// itself is the backoff sleep.
pub async fn fetch_with_retry<F, Fut, T>(backoff: Duration, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, FetchFailure>>,
{
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(FetchFailure::RateLimited) => {
                tracing::warn!(
                    backoff_secs = backoff.as_secs(),
                    "rate limited, waiting before retry"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(FetchFailure::Transport(e)) => {
                tracing::debug!(error = %e, "transport failure, retrying");
            }
            Err(FetchFailure::Fatal(e)) => return Err(e),
        }
    }
}
