use std::sync::Mutex;
use std::time::Duration;

use dir_mimic_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};

/// CLI progress reporter using indicatif.
///
/// - Scan phase: spinner (total files unknown upfront)
/// - Fingerprint phase: progress bar (total known from the scan)
/// - Apply phase: progress bar over the plan's operations
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner(&self, message: &'static str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn counted_bar(&self, total: usize, verb: &str) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(&format!(
                "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} ({{eta}} remaining)",
                verb
            ))
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn set_position(&self, done: usize, total: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            if pb.length() != Some(total as u64) {
                pb.set_length(total as u64);
            }
            pb.set_position(done as u64);
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        self.spinner("Scanning files...");
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &str) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_message(format!("Scanning... {} files found", files_found));
        }
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_fingerprint_start(&self, total_files: usize) {
        if total_files == 0 {
            return;
        }
        self.counted_bar(total_files, "Fingerprinting");
    }

    fn on_fingerprint_progress(&self, files_done: usize, total_files: usize) {
        self.set_position(files_done, total_files);
    }

    fn on_fingerprint_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Fingerprint complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_reconcile_complete(&self, operations: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Reconcile complete: {} operations in {:.2}s",
            operations, duration_secs
        );
    }

    fn on_apply_start(&self, total_operations: usize) {
        if total_operations == 0 {
            return;
        }
        self.counted_bar(total_operations, "Applying");
    }

    fn on_apply_progress(&self, operations_done: usize, total_operations: usize) {
        self.set_position(operations_done, total_operations);
    }

    fn on_apply_complete(&self, succeeded: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Apply complete: {} operations in {:.2}s ({} failed)",
            succeeded, duration_secs, failed
        );
    }
}
