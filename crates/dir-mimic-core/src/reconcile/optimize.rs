use tracing::debug;

use super::classify::{Classification, CopySpec};

/// A copy + delete pair of one identity folded into a single rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSpec {
    pub from: String,
    pub to: String,
}

/// Final operation sets after move folding.
#[derive(Debug, Default)]
pub struct ReconcileOps {
    pub moves: Vec<MoveSpec>,
    pub copies: Vec<CopySpec>,
    pub deletes: Vec<String>,
}

/// Fold copy + delete pairs that share an identity into moves.
///
/// A copy into a new path followed by a delete of an old path of the same
/// identity is a rename: one filesystem move, no moment where the data
/// exists twice. Each pending copy destination, in order, takes the first
/// unused pending delete source of its identity; unpaired destinations stay
/// copies from their originally chosen source, unconsumed sources stay
/// deletes. Destination and deletion multisets are conserved.
pub fn optimize(classification: &Classification) -> ReconcileOps {
    let mut ops = ReconcileOps::default();

    for (key, copies) in &classification.to_copy {
        let pending_deletes = classification
            .extra
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mut consumed = 0usize;

        for copy in copies {
            if consumed < pending_deletes.len() {
                ops.moves.push(MoveSpec {
                    from: pending_deletes[consumed].clone(),
                    to: copy.dest.clone(),
                });
                consumed += 1;
            } else {
                ops.copies.push(copy.clone());
            }
        }

        ops.deletes.extend(pending_deletes[consumed..].iter().cloned());
    }

    // Identities with surplus occurrences and no demand at all: straight
    // deletes.
    for (key, paths) in &classification.extra {
        if !classification.to_copy.contains_key(key) {
            ops.deletes.extend(paths.iter().cloned());
        }
    }

    debug!(
        "Folded into {} moves, {} copies, {} deletes",
        ops.moves.len(),
        ops.copies.len(),
        ops.deletes.len()
    );

    ops
}
