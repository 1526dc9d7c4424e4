/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif; library callers and tests use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_fingerprint_start(&self, _total_files: usize) {}
    fn on_fingerprint_progress(&self, _files_done: usize, _total_files: usize) {}
    fn on_fingerprint_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_reconcile_complete(&self, _operations: usize, _duration_secs: f64) {}
    fn on_apply_start(&self, _total_operations: usize) {}
    fn on_apply_progress(&self, _operations_done: usize, _total_operations: usize) {}
    fn on_apply_complete(&self, _succeeded: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
