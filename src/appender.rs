//! Durable, append-only checkpoint writing.
//!
//! One completed batch becomes one write followed by a data sync, making the
//! append the unit of crash recovery: a batch that never reached the file is
//! indistinguishable from one that was never attempted, and will simply be
//! refetched on the next run.

use crate::error::Result;
use crate::types::OutputRecord;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Appends resolved batches to the checkpoint/output file.
pub struct OutputAppender {
    file: File,
}

impl OutputAppender {
    /// Open (creating if necessary) the checkpoint file for appending.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self { file })
    }

    /// Serialize and append a whole batch as a single write, then sync it to
    /// disk before returning.
    pub async fn append_batch(&mut self, records: &[OutputRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut buf = String::with_capacity(records.len() * 32);
        for record in records {
            buf.push_str(&record.to_line());
            buf.push('\n');
        }
        self.file.write_all(buf.as_bytes()).await?;
        self.file.sync_data().await?;
        Ok(())
    }
}
