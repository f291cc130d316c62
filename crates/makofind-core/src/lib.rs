//! Core types for makofind.
//!
//! This crate holds the data model shared by the walker, the manifest
//! emitter and the rollup: classified directory entries with their stat
//! snapshots, manifest records and their line layout, walk configuration,
//! error types and the run summary that accumulates failures across roots.

mod config;
mod entry;
mod error;
mod record;
mod summary;

pub use config::{DEFAULT_MAX_OPEN_DIRS, WalkConfig, WalkConfigBuilder};
pub use entry::{Entry, EntryKind, FileKind, Stat, Timestamp};
pub use error::WalkError;
pub use record::{ManifestRecord, ManifestTime, physical_kb};
pub use summary::{Outcome, RunSummary};
