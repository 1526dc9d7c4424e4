use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::record::IdentityKey;
use crate::record_set::RecordSet;

/// A pending copy: place the content already present at `source` at `dest`
/// as well. Several destinations of one identity may share a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    pub source: String,
    pub dest: String,
}

/// Total partition of both sides: every inventory path and every target path
/// lands in exactly one bucket. `to_copy` and `extra` stay grouped by
/// identity so move folding can pair within a group.
#[derive(Debug, Default)]
pub struct Classification {
    /// Paths present, with identical identity, on both sides.
    pub unchanged: Vec<String>,
    /// Demanded placements with at least one target occurrence to copy from.
    pub to_copy: BTreeMap<IdentityKey, Vec<CopySpec>>,
    /// Demanded placements of identities the target holds nowhere.
    pub missing: Vec<String>,
    /// Target occurrences at paths the inventory does not demand.
    pub extra: BTreeMap<IdentityKey, Vec<String>>,
}

impl Classification {
    pub fn copy_count(&self) -> usize {
        self.to_copy.values().map(Vec::len).sum()
    }

    pub fn extra_count(&self) -> usize {
        self.extra.values().map(Vec::len).sum()
    }
}

/// Partition every identity present on either side.
///
/// Per identity: paths on both sides are unchanged; demanded paths with at
/// least one occurrence anywhere in the target become copies sourced from
/// the lexicographically first occurrence (occurrences of one identity are
/// interchangeable); demanded paths of an identity the target lacks entirely
/// are missing; surplus target occurrences are extra. Path lists arrive
/// sorted from the record sets, so the outcome is deterministic. Never fails
/// on well-formed record sets.
pub fn classify(inventory: &RecordSet, target: &RecordSet) -> Classification {
    let mut result = Classification::default();

    let keys: BTreeSet<&IdentityKey> = inventory.keys().chain(target.keys()).collect();

    for key in keys {
        let wanted = paths_of(inventory, key);
        let present = paths_of(target, key);
        let wanted_set: BTreeSet<&String> = wanted.iter().collect();
        let present_set: BTreeSet<&String> = present.iter().collect();

        for path in wanted.iter().filter(|path| present_set.contains(path)) {
            result.unchanged.push(path.clone());
        }

        let demanded: Vec<&String> = wanted
            .iter()
            .filter(|path| !present_set.contains(path))
            .collect();
        let surplus: Vec<String> = present
            .iter()
            .filter(|path| !wanted_set.contains(path))
            .cloned()
            .collect();

        if !demanded.is_empty() {
            match present.first() {
                // Any occurrence carries the same content; the first one in
                // path order is the canonical copy source for every
                // destination of this identity.
                Some(source) => {
                    let entries = result.to_copy.entry(key.clone()).or_default();
                    for dest in demanded {
                        entries.push(CopySpec {
                            source: source.clone(),
                            dest: dest.clone(),
                        });
                    }
                }
                None => result.missing.extend(demanded.into_iter().cloned()),
            }
        }

        if !surplus.is_empty() {
            result.extra.entry(key.clone()).or_default().extend(surplus);
        }
    }

    result.unchanged.sort();
    result.missing.sort();

    debug!(
        "Classified {} identities: {} unchanged, {} to copy, {} missing, {} extra",
        inventory.identity_count().max(target.identity_count()),
        result.unchanged.len(),
        result.copy_count(),
        result.missing.len(),
        result.extra_count()
    );

    result
}

fn paths_of(set: &RecordSet, key: &IdentityKey) -> Vec<String> {
    set.get(key)
        .map(|records| records.iter().map(|record| record.relative_path()).collect())
        .unwrap_or_default()
}
