use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::inventory;
use crate::plan::Plan;
use crate::progress::ProgressReporter;
use crate::reconcile;
use crate::record::IdentityLevel;
use crate::record_set::RecordSet;
use crate::scanner;

/// Options for one mirror run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub inventory_path: PathBuf,
    pub target_dir: PathBuf,
    /// Explicit identification level; inferred from the inventory's level
    /// marker when absent.
    pub level: Option<IdentityLevel>,
    /// Include residual deletes of surplus files in the plan.
    pub delete_extra: bool,
    /// Echo unchanged files when the plan is rendered.
    pub echo_unchanged: bool,
    pub ignore_patterns: Vec<String>,
}

/// Reconciliation counts. `unchanged`/`to_copy`/`missing` describe the
/// classification; `extra` is the surplus left over after move folding;
/// `moves`/`copies`/`deletes` are the operations actually planned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub unchanged: usize,
    pub to_copy: usize,
    pub missing: usize,
    pub extra: usize,
    pub moves: usize,
    pub copies: usize,
    pub deletes: usize,
}

#[derive(Debug)]
pub struct MirrorOutcome {
    pub plan: Plan,
    pub summary: MirrorSummary,
    /// The level the run was reconciled at.
    pub level: IdentityLevel,
    pub load_duration: Duration,
    pub scan_duration: Duration,
    pub reconcile_duration: Duration,
}

pub struct MirrorEngine {
    options: MirrorOptions,
}

impl MirrorEngine {
    pub fn new(options: MirrorOptions) -> Self {
        Self { options }
    }

    /// Run the one-shot reconciliation pipeline:
    /// 1. Load the inventory and resolve the identification level
    /// 2. Scan the target directory at that level
    /// 3. Classify both record sets and fold copy+delete pairs into moves
    /// 4. Assemble the ordered operation plan
    ///
    /// Pure after the load and scan; never touches the filesystem. Applying
    /// or rendering the returned plan is the caller's decision.
    pub fn plan(&self, reporter: &dyn ProgressReporter) -> Result<MirrorOutcome, Error> {
        if !self.options.target_dir.is_dir() {
            return Err(Error::NotADirectory(self.options.target_dir.clone()));
        }

        // Phase 1: inventory
        let load_start = Instant::now();
        let loaded = inventory::load(&self.options.inventory_path)?;
        if loaded.skipped_lines > 0 {
            warn!("{} malformed inventory lines skipped", loaded.skipped_lines);
        }
        let level = loaded.resolve_level(self.options.level)?;
        let inventory_set = RecordSet::from_records(loaded.records, level);
        let load_duration = load_start.elapsed();
        info!(
            "Loaded {} inventory records ({} identities) at level {}",
            inventory_set.len(),
            inventory_set.identity_count(),
            level
        );

        // Phase 2: target scan at the same level
        let scan_start = Instant::now();
        let target_records = scanner::scan_directory(
            &self.options.target_dir,
            level,
            &self.options.ignore_patterns,
            reporter,
        )?;
        let target_set = RecordSet::from_records(target_records, level);
        let scan_duration = scan_start.elapsed();
        info!(
            "Scanned {} files in '{}'",
            target_set.len(),
            self.options.target_dir.display()
        );

        // Phase 3: reconcile, purely in memory
        let reconcile_start = Instant::now();
        let classification = reconcile::classify(&inventory_set, &target_set);
        let ops = reconcile::optimize(&classification);

        let summary = MirrorSummary {
            unchanged: classification.unchanged.len(),
            to_copy: classification.copy_count(),
            missing: classification.missing.len(),
            extra: ops.deletes.len(),
            moves: ops.moves.len(),
            copies: ops.copies.len(),
            deletes: if self.options.delete_extra {
                ops.deletes.len()
            } else {
                0
            },
        };

        let plan = Plan::build(
            classification.unchanged,
            ops,
            classification.missing,
            self.options.delete_extra,
            self.options.echo_unchanged,
        );
        let reconcile_duration = reconcile_start.elapsed();
        reporter.on_reconcile_complete(plan.operations.len(), reconcile_duration.as_secs_f64());
        debug!(
            "Reconcile completed in {:.2}s — {} operations planned",
            reconcile_duration.as_secs_f64(),
            plan.operations.len()
        );

        Ok(MirrorOutcome {
            plan,
            summary,
            level,
            load_duration,
            scan_duration,
            reconcile_duration,
        })
    }
}
