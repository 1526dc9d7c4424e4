pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod hasher;
pub mod inventory;
pub mod plan;
pub mod progress;
pub mod reconcile;
pub mod record;
pub mod record_set;
pub mod scanner;

pub use config::AppConfig;
pub use engine::{MirrorEngine, MirrorOptions, MirrorOutcome, MirrorSummary};
pub use error::Error;
pub use executor::ApplyOutcome;
pub use plan::{Operation, Plan};
pub use progress::{ProgressReporter, SilentReporter};
pub use record::{FileRecord, IdentityKey, IdentityLevel};
pub use record_set::RecordSet;
