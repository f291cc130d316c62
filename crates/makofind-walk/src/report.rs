//! Diagnostics and failure accounting.

use std::fmt;
use std::io::{self, Write};

use compact_str::CompactString;
use tracing::{debug, error};

use makofind_core::{Outcome, RunSummary};

/// Writes diagnostics to an error stream and records them in the run summary.
///
/// Every diagnostic marks the run as failed. Lines look like
/// `makofind: Unable to read directory: /manta/x`.
#[derive(Debug)]
pub struct Reporter<E> {
    program: CompactString,
    sink: E,
    summary: RunSummary,
}

impl Reporter<io::Stderr> {
    /// Reporter writing to standard error.
    pub fn stderr(program: &str) -> Self {
        Self::new(program, io::stderr())
    }
}

impl<E: Write> Reporter<E> {
    pub fn new(program: &str, sink: E) -> Self {
        Self {
            program: CompactString::new(program),
            sink,
            summary: RunSummary::new(),
        }
    }

    /// Report a problem and mark the run failed.
    pub fn warn(&mut self, message: impl fmt::Display) {
        debug!(%message, "reported");
        if let Err(err) = writeln!(self.sink, "{}: {}", self.program, message) {
            error!(%err, "failed to write diagnostic");
        }
        self.summary.record_error();
    }

    /// Count a manifest line that was written.
    pub fn record_emitted(&mut self, size: u64) {
        self.summary.record_emitted(size);
    }

    /// Record the outcome of one root.
    pub fn record_root(&mut self, outcome: &Outcome) {
        self.summary.record_root(outcome);
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn into_parts(self) -> (E, RunSummary) {
        (self.sink, self.summary)
    }
}
