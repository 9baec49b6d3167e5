//! The fetch pipeline: resume, batch, classify, fetch, append.
//!
//! A single thread-of-control processes batches strictly one at a time; all
//! concurrency lives inside a batch (the scoped fan-out and the one bulk
//! request). Because every completed batch is durably appended before the
//! next one starts, killing the process at any point is safe: the next run
//! resumes behind the last appended batch.

use crate::appender::OutputAppender;
use crate::classify;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::DownloadsClient;
use crate::resume;
use crate::source::{self, PackageNameSource};
use crate::types::{OutputRecord, PackageName};
use std::collections::HashMap;

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Names fetched and appended by this run
    pub fetched: usize,
    /// Names already in the checkpoint at startup and skipped
    pub skipped: usize,
    /// Total names extractable from the input dump
    pub total: usize,
}

/// Fetch download counts for every name in the input dump that is not yet in
/// the checkpoint, appending results batch by batch.
///
/// Fatal errors abort the run mid-way; the checkpoint stays valid up to the
/// last completed batch and a rerun picks up from there.
pub async fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let resume_set = resume::load_resume_set(&config.output_path).await?;
    let skipped = resume_set.len();
    let total = source::count_names(&config.input_path).await?;
    tracing::info!(total, skipped, "starting fetch run");

    let client = DownloadsClient::new(config)?;
    let mut names =
        PackageNameSource::open(&config.input_path, config.concurrency_limit, resume_set).await?;
    let mut appender = OutputAppender::open(&config.output_path).await?;

    let mut fetched = 0usize;
    while let Some(batch) = names.next_batch().await? {
        let (scoped, unscoped) = classify::partition(&batch);
        let (scoped_records, unscoped_records) = tokio::try_join!(
            client.fetch_scoped(&scoped),
            client.fetch_unscoped(&unscoped),
        )?;
        let records = merge_in_batch_order(&batch, scoped_records, unscoped_records);
        appender.append_batch(&records).await?;

        for record in &records {
            fetched += 1;
            let done = skipped + fetched;
            let percent = if total == 0 {
                100.0
            } else {
                done as f64 * 100.0 / total as f64
            };
            tracing::info!(
                package = %record.name,
                downloads = ?record.downloads,
                "persisted {done}/{total} ({percent:.1}%)"
            );
        }
    }

    tracing::info!(fetched, skipped, total, "run complete");
    Ok(RunSummary {
        fetched,
        skipped,
        total,
    })
}

/// Re-interleave the two groups' results into the batch's original order.
/// Both fetch paths return their group in group order, so a name lookup is
/// all that is needed.
fn merge_in_batch_order(
    batch: &[PackageName],
    scoped: Vec<OutputRecord>,
    unscoped: Vec<OutputRecord>,
) -> Vec<OutputRecord> {
    let by_name: HashMap<PackageName, Option<u64>> = scoped
        .into_iter()
        .chain(unscoped)
        .map(|record| (record.name, record.downloads))
        .collect();
    batch
        .iter()
        .map(|name| OutputRecord {
            name: name.clone(),
            downloads: by_name.get(name).copied().flatten(),
        })
        .collect()
}
