mod classify;
mod optimize;

pub use classify::{classify, Classification, CopySpec};
pub use optimize::{optimize, MoveSpec, ReconcileOps};
