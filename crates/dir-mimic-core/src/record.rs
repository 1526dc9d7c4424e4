use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identification precision tier. Deeper tiers fold content digests into the
/// identity key; the tier used to build an inventory and the tier used to
/// scan a target must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityLevel {
    /// Filename + byte size.
    NameSize = 1,
    /// Filename + size + digest of the first (and last) 64 KiB.
    SampleHash = 2,
    /// Filename + size + digest of the whole byte stream.
    FullHash = 3,
}

impl IdentityLevel {
    pub fn from_number(n: u8) -> Result<IdentityLevel, Error> {
        match n {
            1 => Ok(IdentityLevel::NameSize),
            2 => Ok(IdentityLevel::SampleHash),
            3 => Ok(IdentityLevel::FullHash),
            other => Err(Error::InvalidLevel(other)),
        }
    }

    pub fn as_number(self) -> u8 {
        self as u8
    }

    pub fn needs_sample_hash(self) -> bool {
        self >= IdentityLevel::SampleHash
    }

    pub fn needs_full_hash(self) -> bool {
        self == IdentityLevel::FullHash
    }
}

impl fmt::Display for IdentityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// One observed or recorded file. Constructed once by a scan or an inventory
/// parse, immutable afterward. Field names double as the JSONL inventory
/// schema, so a record serializes straight to an inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Directory-relative folder, forward-slash separated, "" for the root.
    #[serde(default)]
    pub folder: String,
    pub filename: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_sha1: Option<String>,
}

impl FileRecord {
    /// Full relative path, folder and filename joined with '/'.
    pub fn relative_path(&self) -> String {
        if self.folder.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.folder, self.filename)
        }
    }

    /// Identity key at `level`, or `None` when the record lacks the digest
    /// that level requires.
    pub fn identity_key(&self, level: IdentityLevel) -> Option<IdentityKey> {
        let fingerprint = match level {
            IdentityLevel::NameSize => None,
            IdentityLevel::SampleHash => Some(self.sample_sha1.clone()?),
            IdentityLevel::FullHash => Some(self.full_sha1.clone()?),
        };
        Some(IdentityKey {
            filename: self.filename.clone(),
            size: self.size,
            fingerprint,
        })
    }

    /// Deepest level this record's fields can satisfy. Used to infer the
    /// level marker of a stored inventory.
    pub fn max_level(&self) -> IdentityLevel {
        if self.full_sha1.is_some() {
            IdentityLevel::FullHash
        } else if self.sample_sha1.is_some() {
            IdentityLevel::SampleHash
        } else {
            IdentityLevel::NameSize
        }
    }
}

/// Two records are "the same file" at a level iff their keys at that level
/// are equal. Ord so keyed maps iterate in a reproducible order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey {
    pub filename: String,
    pub size: u64,
    pub fingerprint: Option<String>,
}
