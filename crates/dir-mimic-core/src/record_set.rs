use std::collections::BTreeMap;

use tracing::warn;

use crate::record::{FileRecord, IdentityKey, IdentityLevel};

/// Identity-keyed view of one side of a reconciliation (the inventory or the
/// live target scan). Duplicate occurrences of an identity are preserved as
/// separate list entries, sorted by relative path. Built once, read-only
/// afterward.
#[derive(Debug, Default)]
pub struct RecordSet {
    groups: BTreeMap<IdentityKey, Vec<FileRecord>>,
}

impl RecordSet {
    /// Group records by identity key in one pass. Records that cannot form a
    /// key at `level` (a digest field the level requires is absent) are
    /// dropped with a warning rather than failing the whole set.
    pub fn from_records(records: Vec<FileRecord>, level: IdentityLevel) -> RecordSet {
        let mut groups: BTreeMap<IdentityKey, Vec<FileRecord>> = BTreeMap::new();

        for record in records {
            match record.identity_key(level) {
                Some(key) => groups.entry(key).or_default().push(record),
                None => warn!(
                    "Skipping '{}': record carries no level {} fingerprint",
                    record.relative_path(),
                    level
                ),
            }
        }

        // Sorted occurrence lists keep classification and move pairing
        // reproducible across runs regardless of input order.
        for occurrences in groups.values_mut() {
            occurrences.sort_by_key(|record| record.relative_path());
        }

        RecordSet { groups }
    }

    /// Total number of records across all identities.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn identity_count(&self) -> usize {
        self.groups.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        self.groups.keys()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&[FileRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }
}
