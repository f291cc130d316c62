//! Per-root outcomes and the run-wide summary.

use serde::Serialize;

use crate::error::WalkError;

/// Result of walking one root.
#[derive(Debug)]
pub enum Outcome {
    /// The subtree was enumerated, possibly with per-entry errors.
    Completed,
    /// Traversal of the root stopped early.
    Aborted(WalkError),
}

impl Outcome {
    /// Check if the root was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }
}

/// Counters and the failure bit accumulated across all roots of a run.
///
/// The failure bit can be set but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    failed: bool,
    /// Roots attempted.
    pub roots: u64,
    /// Roots that aborted.
    pub roots_aborted: u64,
    /// Manifest records written.
    pub records: u64,
    /// Sum of logical sizes of written records.
    pub bytes: u64,
    /// Problems reported.
    pub errors: u64,
}

impl RunSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that something went wrong.
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// Check if any error was recorded.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Check if the run finished without any error.
    pub fn is_success(&self) -> bool {
        !self.failed
    }

    /// Record a reported problem. Always marks the run failed.
    pub fn record_error(&mut self) {
        self.errors += 1;
        self.mark_failed();
    }

    /// Record a written manifest line.
    pub fn record_emitted(&mut self, size: u64) {
        self.records += 1;
        self.bytes = self.bytes.saturating_add(size);
    }

    /// Record the outcome of one root.
    pub fn record_root(&mut self, outcome: &Outcome) {
        self.roots += 1;
        if outcome.is_aborted() {
            self.roots_aborted += 1;
            self.mark_failed();
        }
    }
}
