//! Streaming filesystem walker for makofind.
//!
//! This crate walks directory trees depth-first without ever holding more
//! than the chain of currently open directories in memory, which keeps
//! memory at O(depth) even for trees with millions of objects.
//!
//! # Overview
//!
//! - [`Walker`] produces a [`Walk`], a lazy iterator of classified
//!   [`Entry`] values for one root. Symlinks are never followed and entries
//!   on a different device than the root are skipped.
//! - The number of open directory handles is bounded by
//!   [`WalkConfig::max_open_dirs`]; a deeper tree aborts its root instead of
//!   exhausting descriptors.
//! - A [`Visitor`] decides what to do with each entry. [`ManifestVisitor`]
//!   writes one manifest line per regular file.
//! - [`Driver`] iterates over the roots, feeds the visitor and accumulates a
//!   [`RunSummary`] through its [`Reporter`].
//!
//! # Example
//!
//! ```rust,no_run
//! use makofind_walk::{Driver, ManifestVisitor, Reporter, WalkConfig, Walker};
//!
//! let walker = Walker::new(WalkConfig::default());
//! let mut driver = Driver::new(walker, Reporter::stderr("makofind"));
//! let mut visitor = ManifestVisitor::new(std::io::stdout().lock());
//!
//! let summary = driver.run(&["/manta"], &mut visitor);
//! std::process::exit(if summary.is_success() { 0 } else { 1 });
//! ```

mod driver;
mod fs;
mod mount;
mod report;
mod stack;
mod visitor;
mod walker;

pub use driver::Driver;
pub use fs::{Filesystem, OsDir, OsFilesystem};
pub use mount::same_device;
pub use report::Reporter;
pub use stack::DirStack;
pub use visitor::{Flow, ManifestVisitor, Visitor, apply_policy};
pub use walker::{Walk, Walker};

// Re-export core types for convenience
pub use makofind_core::{
    Entry, EntryKind, FileKind, ManifestRecord, Outcome, RunSummary, Stat, Timestamp, WalkConfig,
    WalkError,
};
