//! Partitioning a batch into scoped and unscoped request groups.
//!
//! The statistics API offers two incompatible request shapes: scoped names
//! (`@owner/name`) only work on the per-name endpoint, unscoped names are
//! eligible for the comma-joined bulk endpoint.

use crate::types::PackageName;

/// Split a batch into (scoped, unscoped) groups, each preserving the batch's
/// relative order.
///
/// The partition is exhaustive and exclusive: every input name lands in
/// exactly one group.
pub fn partition(batch: &[PackageName]) -> (Vec<PackageName>, Vec<PackageName>) {
    batch
        .iter()
        .cloned()
        .partition(|name| name.is_scoped())
}
