//! Managed-volume operations
//!
//! Each operation takes the [`Session`](crate::client::Session) explicitly
//! plus an optional per-call timeout, and turns benign "nothing to do"
//! states into [`Outcome::NoopAlready`] rather than errors.

pub mod export;
pub mod lookup;
pub mod snapshot;

use serde::Serialize;

pub use export::{export_snapshot, snapshot_exports, ExportOptions, ExportOutcome, ShareType};
pub use lookup::{channels, get_snapshot, list_snapshots};
pub use snapshot::{begin_snapshot, end_snapshot, volume_state, SlaChoice};

/// Result of a state-changing call that may already be satisfied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome<T> {
    Applied(T),
    NoopAlready(NoopReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    AlreadyWritable,
    AlreadyReadOnly,
}

impl std::fmt::Display for NoopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoopReason::AlreadyWritable => write!(f, "already in a writable state"),
            NoopReason::AlreadyReadOnly => write!(f, "already in a read only state"),
        }
    }
}
