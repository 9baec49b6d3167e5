//! Lazy, batched extraction of package names from a registry dump.
//!
//! The dump is newline-delimited and huge (millions of lines), and it is not
//! valid as one JSON document, so lines are scanned with a fast prefix match
//! instead of a parser. Reading goes through a buffered sequential reader;
//! the file is never materialized in memory.

use crate::error::Result;
use crate::types::PackageName;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Structural prefix a dump line must carry to contribute a package name.
const NAME_PREFIX: &str = "{\"id\":\"";

/// Delimiter terminating the name after the prefix.
const NAME_TERMINATOR: char = '"';

/// Extract the package name from one dump line, if the line qualifies.
///
/// A line qualifies only if it starts with `{"id":"`; the name is everything
/// up to the next `"`. Assumes at most one name per line and that the name
/// contains no escaped quotes; both hold for registry `_all_docs` dumps.
/// Anything else (headers, closing brackets, garbage) yields `None` and is
/// silently dropped by the caller.
pub fn extract_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(NAME_PREFIX)?;
    let end = rest.find(NAME_TERMINATOR)?;
    Some(&rest[..end])
}

/// Streaming count of the names extractable from a dump file.
///
/// Used once at startup for progress reporting; same memory bound as the
/// batched read.
pub async fn count_names(path: &Path) -> Result<usize> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        if extract_name(&line).is_some() {
            count += 1;
        }
    }
    Ok(count)
}

/// Streams candidate package names from a dump file in bounded batches.
///
/// Names already present in the skip set (the resume set) are filtered out
/// before batching, so every yielded batch holds up to `batch_size` names of
/// actual remaining work, in file order. The sequence is forward-only; replay
/// requires reopening the file.
pub struct PackageNameSource {
    lines: Lines<BufReader<File>>,
    batch_size: usize,
    skip: HashSet<PackageName>,
}

impl PackageNameSource {
    /// Open `path` for sequential reading.
    ///
    /// `skip` is the resume set computed at startup; it is not re-observed
    /// during the run.
    pub async fn open(
        path: &Path,
        batch_size: usize,
        skip: HashSet<PackageName>,
    ) -> Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            batch_size,
            skip,
        })
    }

    /// Read the next batch of up to `batch_size` names, or `None` when the
    /// file is exhausted.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<PackageName>>> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            let Some(name) = extract_name(&line) else {
                continue;
            };
            let name = PackageName::from(name);
            if !self.skip.contains(&name) {
                batch.push(name);
            }
        }
        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dump_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn extracts_scoped_and_unscoped_names_and_drops_garbage() {
        assert_eq!(
            extract_name(r#"{"id":"@foo/bar","key":"@foo/bar","value":{}}"#),
            Some("@foo/bar")
        );
        assert_eq!(extract_name(r#"{"id":"baz","key":"baz"}"#), Some("baz"));
        assert_eq!(extract_name("garbage"), None);
        assert_eq!(extract_name(r#"{"total_rows":3582154,"offset":0}"#), None);
        assert_eq!(extract_name(""), None);
    }

    #[test]
    fn extraction_stops_at_first_quote() {
        assert_eq!(
            extract_name(r#"{"id":"left-pad","deleted":true}"#),
            Some("left-pad")
        );
    }

    #[tokio::test]
    async fn batches_respect_size_limit_and_file_order() {
        let file = dump_file(&[
            r#"{"id":"a","value":{}}"#,
            r#"{"id":"b","value":{}}"#,
            "not a record",
            r#"{"id":"c","value":{}}"#,
            r#"{"id":"d","value":{}}"#,
            r#"{"id":"e","value":{}}"#,
        ]);

        let mut source = PackageNameSource::open(file.path(), 2, HashSet::new())
            .await
            .unwrap();

        let first = source.next_batch().await.unwrap().unwrap();
        assert_eq!(first, vec!["a".into(), "b".into()]);
        let second = source.next_batch().await.unwrap().unwrap();
        assert_eq!(second, vec!["c".into(), "d".into()]);
        let third = source.next_batch().await.unwrap().unwrap();
        assert_eq!(third, vec!["e".into()]);
        assert!(source.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn skip_set_filters_before_batching() {
        let file = dump_file(&[
            r#"{"id":"a","value":{}}"#,
            r#"{"id":"b","value":{}}"#,
            r#"{"id":"c","value":{}}"#,
        ]);
        let skip: HashSet<PackageName> = [PackageName::from("b")].into();

        let mut source = PackageNameSource::open(file.path(), 2, skip).await.unwrap();

        // "b" is filtered out before batching, so "a" and "c" fill one batch
        let batch = source.next_batch().await.unwrap().unwrap();
        assert_eq!(batch, vec!["a".into(), "c".into()]);
        assert!(source.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_file_yields_no_batches() {
        let file = dump_file(&[]);
        let mut source = PackageNameSource::open(file.path(), 8, HashSet::new())
            .await
            .unwrap();
        assert!(source.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_names_matches_extractable_lines() {
        let file = dump_file(&[
            r#"{"id":"@foo/bar","value":{}}"#,
            "garbage",
            r#"{"id":"baz","value":{}}"#,
        ]);
        assert_eq!(count_names(file.path()).await.unwrap(), 2);
    }
}
