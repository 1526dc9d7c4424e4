use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::plan::{Operation, Plan};
use crate::progress::ProgressReporter;

/// Result of applying a plan. `failed > 0` means the run as a whole failed,
/// but every independent operation was still attempted. Partial progress is
/// preserved; there is no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl ApplyOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Apply every operation against `target_root`, in plan order. A failing
/// operation (source vanished, permission denied, destination collision) is
/// logged and counted; execution continues with the remaining operations.
pub fn apply(plan: &Plan, target_root: &Path, reporter: &dyn ProgressReporter) -> ApplyOutcome {
    let start = Instant::now();
    let total = plan.operations.len();
    reporter.on_apply_start(total);

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for (index, operation) in plan.operations.iter().enumerate() {
        match apply_one(operation, target_root) {
            Ok(()) => {
                succeeded += 1;
                debug!("{}", operation.to_command());
            }
            Err(err) => {
                failed += 1;
                error!("Failed: {}: {}", operation.to_command(), err);
            }
        }
        reporter.on_apply_progress(index + 1, total);
    }

    if !plan.missing.is_empty() {
        warn!(
            "{} inventory files have no source in the target and were not restored",
            plan.missing.len()
        );
    }

    let duration = start.elapsed();
    reporter.on_apply_complete(succeeded, failed, duration.as_secs_f64());
    info!(
        "Applied {} operations in {:.2}s, {} failed",
        succeeded,
        duration.as_secs_f64(),
        failed
    );

    ApplyOutcome { succeeded, failed }
}

fn apply_one(operation: &Operation, root: &Path) -> std::io::Result<()> {
    match operation {
        Operation::EnsureDir(dir) => fs::create_dir_all(root.join(dir)),
        Operation::Move { from, to } => fs::rename(root.join(from), root.join(to)),
        Operation::Copy { from, to } => fs::copy(root.join(from), root.join(to)).map(|_| ()),
        Operation::Delete(path) => fs::remove_file(root.join(path)),
    }
}
