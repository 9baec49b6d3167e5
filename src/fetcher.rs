//! Registry statistics API client: per-name and bulk download-count fetching.
//!
//! Scoped names (`@owner/name`) go through the per-name endpoint, one request
//! each, fanned out concurrently up to the configured limit. Unscoped names
//! share a single comma-joined bulk request. Both paths run under the same
//! retry policy ([`crate::retry`]); every name handed in resolves to a
//! definite value or the whole operation fails fatally.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::{FetchFailure, fetch_with_retry};
use crate::types::{OutputRecord, PackageName};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Body of a per-name statistics response: `{"downloads": number|null}`.
/// The bulk endpoint returns one of these per name.
#[derive(Debug, Deserialize)]
struct PointResponse {
    downloads: Option<u64>,
}

/// Client for the registry's download-count endpoints.
pub struct DownloadsClient {
    http: reqwest::Client,
    base_url: String,
    backoff: Duration,
    limit: usize,
}

impl DownloadsClient {
    /// Build a client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("npm-downloads/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.registry_url.trim_end_matches('/').to_string(),
            backoff: config.backoff,
            limit: config.concurrency_limit,
        })
    }

    /// Fetch weekly counts for scoped names, one concurrent request per name.
    ///
    /// At most `concurrency_limit` requests are in flight at once, and results
    /// come back in input order regardless of completion order. A 404 resolves
    /// to `None` (package unknown); 429 and transport failures are retried per
    /// the policy; any other status aborts the run.
    pub async fn fetch_scoped(&self, names: &[PackageName]) -> Result<Vec<OutputRecord>> {
        stream::iter(names)
            .map(|name| async move {
                let downloads = self.fetch_point(name).await?;
                Ok::<_, Error>(OutputRecord {
                    name: name.clone(),
                    downloads,
                })
            })
            .buffered(self.limit)
            .try_collect()
            .await
    }

    /// Fetch weekly counts for unscoped names in one bulk request.
    ///
    /// Handing in more names than the per-request limit is a caller error and
    /// fails fast; the group is never silently truncated. A name absent from
    /// (or null in) the response body resolves to zero, which deliberately
    /// differs from the per-name 404 → `None` mapping. A 429 retries the
    /// entire group after the backoff interval; the policy does not isolate a
    /// persistently problematic member.
    pub async fn fetch_unscoped(&self, names: &[PackageName]) -> Result<Vec<OutputRecord>> {
        if names.len() > self.limit {
            return Err(Error::BatchTooLarge {
                len: names.len(),
                limit: self.limit,
            });
        }
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let joined = names
            .iter()
            .map(PackageName::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.point_url(&joined);

        let counts =
            fetch_with_retry(self.backoff, || self.bulk_attempt(&url, &joined)).await?;

        Ok(names
            .iter()
            .map(|name| OutputRecord {
                name: name.clone(),
                downloads: Some(
                    counts
                        .get(name.as_str())
                        .and_then(Option::as_ref)
                        .and_then(|point| point.downloads)
                        .unwrap_or(0),
                ),
            })
            .collect())
    }

    /// One per-name fetch, retried per the policy until it resolves.
    async fn fetch_point(&self, name: &PackageName) -> Result<Option<u64>> {
        let url = self.point_url(name.as_str());
        fetch_with_retry(self.backoff, || self.point_attempt(&url, name)).await
    }

    /// A single attempt against the per-name endpoint.
    async fn point_attempt(
        &self,
        url: &str,
        name: &PackageName,
    ) -> std::result::Result<Option<u64>, FetchFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;
        match response.status() {
            StatusCode::OK => {
                let body: PointResponse = response.json().await.map_err(classify_body_error)?;
                Ok(body.downloads)
            }
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchFailure::RateLimited),
            status => Err(FetchFailure::Fatal(Error::UnexpectedStatus {
                package: name.to_string(),
                status: status.as_u16(),
            })),
        }
    }

    /// A single attempt against the bulk endpoint. Null entries are kept so
    /// the caller can map them to zero alongside absent ones.
    async fn bulk_attempt(
        &self,
        url: &str,
        joined: &str,
    ) -> std::result::Result<HashMap<String, Option<PointResponse>>, FetchFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;
        match response.status() {
            StatusCode::OK => response.json().await.map_err(classify_body_error),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchFailure::RateLimited),
            status => Err(FetchFailure::Fatal(Error::UnexpectedStatus {
                package: joined.to_string(),
                status: status.as_u16(),
            })),
        }
    }

    fn point_url(&self, suffix: &str) -> String {
        format!("{}/downloads/point/last-week/{}", self.base_url, suffix)
    }
}

/// A body read can fail two ways: the bytes never arrived (transport, retry)
/// or they arrived but do not parse into the expected shape (fatal).
fn classify_body_error(e: reqwest::Error) -> FetchFailure {
    if e.is_decode() {
        FetchFailure::Fatal(Error::Network(e))
    } else {
        FetchFailure::Transport(e)
    }
}
