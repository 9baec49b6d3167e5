//! Resume set construction from the checkpoint file.
//!
//! Built once at startup; the checkpoint's growth during the run is not
//! re-observed. Every name in the set is skipped by the source, which is what
//! makes interrupted runs cheap to restart.

use crate::error::Result;
use crate::types::PackageName;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Read the set of already-fetched package names from the checkpoint file.
///
/// A missing file means a fresh run and yields an empty set. Each line's
/// substring before the first comma is taken as a name. A line with no comma
/// is a partial write from a killed process; it is skipped with a warning so
/// the affected name is fetched again (duplicating an identical value at
/// worst, never losing one).
pub async fn load_resume_set(path: &Path) -> Result<HashSet<PackageName>> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut lines = BufReader::new(file).lines();
    let mut set = HashSet::new();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        match line.split_once(',') {
            Some((name, _)) => {
                set.insert(PackageName::from(name));
            }
            None => {
                tracing::warn!(line = %line, "checkpoint line has no delimiter, ignoring");
            }
        }
    }
    Ok(set)
}
