//! Core types: package names, download counts, and checkpoint records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter between the package name and its count in the checkpoint file.
///
/// One record per line: `<name>, <count|null>`. Downstream consumers split on
/// the first comma, so the name must come first and names never contain commas
/// (the registry forbids them).
pub const RECORD_DELIMITER: &str = ", ";

/// An npm package identifier.
///
/// Two shapes exist: *scoped* (`@owner/name`) and *unscoped* (`name`). The
/// distinction matters because the registry's statistics API only accepts
/// unscoped names on its bulk endpoint; scoped names must be fetched one at a
/// time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Wrap a raw identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a scoped (`@owner/name`) identifier.
    ///
    /// Purely a function of the leading character.
    pub fn is_scoped(&self) -> bool {
        self.0.starts_with('@')
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A resolved (name, weekly download count) pair, one checkpoint line.
///
/// `downloads` is `None` when the registry reported the package as not found
/// (scoped 404). On the bulk path a name absent from the response means "no
/// data", which maps to `Some(0)` instead; the two cases stay distinct in
/// the output file (`null` vs `0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRecord {
    /// The package the count belongs to.
    pub name: PackageName,
    /// Weekly download count, or `None` for "not found".
    pub downloads: Option<u64>,
}

impl OutputRecord {
    /// Serialize to one checkpoint line (without trailing newline).
    pub fn to_line(&self) -> String {
        match self.downloads {
            Some(count) => format!("{}{}{}", self.name, RECORD_DELIMITER, count),
            None => format!("{}{}null", self.name, RECORD_DELIMITER),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_name_detected_by_leading_at() {
        assert!(PackageName::from("@foo/bar").is_scoped());
        assert!(!PackageName::from("baz").is_scoped());
        // only the leading character counts
        assert!(!PackageName::from("foo@2").is_scoped());
    }

    #[test]
    fn record_with_count_serializes_name_comma_count() {
        let record = OutputRecord {
            name: PackageName::from("lodash"),
            downloads: Some(52_000_000),
        };
        assert_eq!(record.to_line(), "lodash, 52000000");
    }

    #[test]
    fn record_without_count_serializes_null_literal() {
        let record = OutputRecord {
            name: PackageName::from("@gone/package"),
            downloads: None,
        };
        assert_eq!(record.to_line(), "@gone/package, null");
    }

    #[test]
    fn zero_count_is_distinct_from_null() {
        let zero = OutputRecord {
            name: PackageName::from("quiet-pkg"),
            downloads: Some(0),
        };
        assert_eq!(zero.to_line(), "quiet-pkg, 0");
    }

    #[test]
    fn package_name_round_trips_through_json() {
        let name = PackageName::from("@scope/pkg");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"@scope/pkg\"");
        let back: PackageName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
