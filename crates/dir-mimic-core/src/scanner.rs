use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::error::Error;
use crate::hasher;
use crate::progress::ProgressReporter;
use crate::record::{FileRecord, IdentityLevel};

/// Walk `root` and produce one record per regular file, fingerprinted
/// according to `level` (level 3 computes both the sample and full digests).
///
/// Ignore patterns match against the root-relative path and prune whole
/// directory subtrees. Symlinks are skipped. Zero-byte files are kept, since
/// a mirror has to reproduce them. Per-file read failures are logged and
/// skipped; only the walk itself failing is fatal.
pub fn scan_directory(
    root: &Path,
    level: IdentityLevel,
    ignore_globs: &[String],
    reporter: &dyn ProgressReporter,
) -> Result<Vec<FileRecord>, Error> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let ignore_patterns = compile_patterns(ignore_globs);

    // Phase 1: collect candidate files. The walk is sorted by file name so
    // record order is reproducible across runs and platforms.
    reporter.on_scan_start();
    let walk_start = Instant::now();

    let mut candidates: Vec<Candidate> = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry.path(), root, &ignore_patterns));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!("Error walking '{}': {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                error!("Error reading metadata for '{}': {}", entry.path().display(), err);
                continue;
            }
        };
        let Some((folder, filename)) = split_relative(entry.path(), root) else {
            continue;
        };

        candidates.push(Candidate {
            path: entry.into_path(),
            folder,
            filename,
            size,
        });
        if let Some(candidate) = candidates.last() {
            reporter.on_scan_progress(candidates.len(), &candidate.path.to_string_lossy());
        }
    }

    reporter.on_scan_complete(candidates.len(), walk_start.elapsed().as_secs_f64());

    // Phase 2: fingerprint in parallel. A file that cannot be read is logged
    // and dropped; the rest of the scan is unaffected.
    let fingerprint_start = Instant::now();
    let total = candidates.len();
    reporter.on_fingerprint_start(total);
    let done = AtomicUsize::new(0);

    let mut records: Vec<FileRecord> = candidates
        .par_iter()
        .filter_map(|candidate| {
            let record = build_record(candidate, level);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_fingerprint_progress(finished, total);
            match record {
                Ok(record) => Some(record),
                Err(err) => {
                    error!("Error fingerprinting '{}': {}", candidate.path.display(), err);
                    None
                }
            }
        })
        .collect();

    // par_iter preserves input order, but keep the contract explicit.
    records.sort_by_key(|record| record.relative_path());

    reporter.on_fingerprint_complete(records.len(), fingerprint_start.elapsed().as_secs_f64());
    debug!(
        "Scanned '{}': {} files at level {}",
        root.display(),
        records.len(),
        level
    );

    Ok(records)
}

struct Candidate {
    path: PathBuf,
    folder: String,
    filename: String,
    size: u64,
}

fn build_record(candidate: &Candidate, level: IdentityLevel) -> std::io::Result<FileRecord> {
    let sample_sha1 = if level.needs_sample_hash() {
        Some(hasher::sample_sha1(&candidate.path)?)
    } else {
        None
    };
    let full_sha1 = if level.needs_full_hash() {
        Some(hasher::full_sha1(&candidate.path)?)
    } else {
        None
    };

    Ok(FileRecord {
        folder: candidate.folder.clone(),
        filename: candidate.filename.clone(),
        size: candidate.size,
        sample_sha1,
        full_sha1,
    })
}

fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!("Invalid glob pattern '{}': {}", glob, err);
                None
            }
        })
        .collect()
}

fn is_ignored(path: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    if relative.as_os_str().is_empty() {
        // Never prune the root itself.
        return false;
    }
    patterns.iter().any(|pattern| pattern.matches_path(relative))
}

/// Split a path under `root` into its inventory (folder, filename) pair,
/// with forward slashes regardless of platform.
fn split_relative(path: &Path, root: &Path) -> Option<(String, String)> {
    let relative = path.strip_prefix(root).ok()?;
    let filename = relative.file_name()?.to_string_lossy().into_owned();
    let folder = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();
    Some((folder, filename))
}
