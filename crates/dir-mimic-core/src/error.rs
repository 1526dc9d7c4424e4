use std::path::PathBuf;

use thiserror::Error;

use crate::record::IdentityLevel;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inventory error in '{path}': {reason}")]
    Inventory { path: PathBuf, reason: String },

    #[error("Invalid identification level {0} (expected 1, 2 or 3)")]
    InvalidLevel(u8),

    #[error("Level {requested} requested but the inventory only carries level {available} fields")]
    LevelMismatch {
        requested: IdentityLevel,
        available: IdentityLevel,
    },

    #[error("Cannot determine identification level: the inventory has no level marker and none was supplied")]
    AmbiguousLevel,

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("{0}")]
    Other(String),
}
