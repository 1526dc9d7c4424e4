use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Error;
use crate::record::{FileRecord, IdentityLevel};

/// A parsed inventory file: the records plus what was learned while reading.
#[derive(Debug)]
pub struct Inventory {
    pub records: Vec<FileRecord>,
    /// Malformed lines skipped during the load.
    pub skipped_lines: usize,
    marker: Option<IdentityLevel>,
}

impl Inventory {
    /// The level marker stored in the file, read off the first well-formed
    /// record (`full_sha1` present ⇒ 3, else `sample_sha1` ⇒ 2, else 1).
    pub fn marker_level(&self) -> Option<IdentityLevel> {
        self.marker
    }

    /// Resolve the active identification level. An explicit request wins
    /// when the stored records can satisfy it; without one the stored marker
    /// is used. Neither available is fatal: reconciliation cannot proceed
    /// without a known identity scheme.
    pub fn resolve_level(&self, requested: Option<IdentityLevel>) -> Result<IdentityLevel, Error> {
        match (requested, self.marker) {
            (Some(requested), Some(available)) if requested > available => {
                Err(Error::LevelMismatch { requested, available })
            }
            (Some(requested), _) => Ok(requested),
            (None, Some(marker)) => Ok(marker),
            (None, None) => Err(Error::AmbiguousLevel),
        }
    }
}

/// Load a JSONL inventory. Blank lines are ignored; a malformed line is
/// skipped with a warning rather than aborting the load, as long as the file
/// itself stays readable.
pub fn load(path: &Path) -> Result<Inventory, Error> {
    let file = File::open(path).map_err(|err| Error::Inventory {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped_lines = 0usize;
    let mut marker = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| Error::Inventory {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<FileRecord>(trimmed) {
            Ok(record) => {
                if marker.is_none() {
                    marker = Some(record.max_level());
                }
                records.push(record);
            }
            Err(err) => {
                warn!("Skipping malformed inventory line {}: {}", index + 1, err);
                skipped_lines += 1;
            }
        }
    }

    debug!(
        "Loaded {} records from '{}' ({} lines skipped)",
        records.len(),
        path.display(),
        skipped_lines
    );

    Ok(Inventory {
        records,
        skipped_lines,
        marker,
    })
}

/// Write records as one JSON object per line. Digest fields deeper than
/// `level` are stripped so the file carries an unambiguous level marker.
pub fn write(path: &Path, records: &[FileRecord], level: IdentityLevel) -> Result<(), Error> {
    let file = File::create(path).map_err(|err| Error::Inventory {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    for record in records {
        let mut record = record.clone();
        if !level.needs_sample_hash() {
            record.sample_sha1 = None;
        }
        if !level.needs_full_hash() {
            record.full_sha1 = None;
        }
        let line = serde_json::to_string(&record)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    debug!(
        "Wrote {} records to '{}' at level {}",
        records.len(),
        path.display(),
        level
    );
    Ok(())
}
