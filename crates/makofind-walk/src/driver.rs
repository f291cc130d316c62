//! Root iteration.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use makofind_core::{Outcome, RunSummary, WalkError};

use crate::fs::Filesystem;
use crate::report::Reporter;
use crate::visitor::{Flow, Visitor};
use crate::walker::Walker;

/// Walks a list of roots in order and feeds a visitor.
pub struct Driver<F, E> {
    walker: Walker<F>,
    reporter: Reporter<E>,
}

impl<F: Filesystem, E: Write> Driver<F, E> {
    pub fn new(walker: Walker<F>, reporter: Reporter<E>) -> Self {
        Self { walker, reporter }
    }

    /// Walk every root in order and return the accumulated summary.
    ///
    /// An aborted root does not stop the remaining ones unless
    /// `stop_on_abort` is set. An empty root list is itself a failure.
    pub fn run<P: AsRef<Path>, V: Visitor>(&mut self, roots: &[P], visitor: &mut V) -> RunSummary {
        if roots.is_empty() {
            self.reporter.warn("no root paths given");
            return self.reporter.summary().clone();
        }

        for root in roots {
            let outcome = self.walk_root(root.as_ref(), visitor);
            let aborted = outcome.is_aborted();
            self.reporter.record_root(&outcome);

            if aborted && self.walker.config().stop_on_abort {
                info!(root = %root.as_ref().display(), "stopping after aborted root");
                break;
            }
        }

        self.reporter.summary().clone()
    }

    /// Walk a single root.
    pub fn walk_root<V: Visitor>(&mut self, root: &Path, visitor: &mut V) -> Outcome {
        let outcome = self.drive(root, visitor);

        match &outcome {
            Outcome::Completed => debug!(root = %root.display(), "walk completed"),
            // Already reported by the visitor.
            Outcome::Aborted(WalkError::VisitorAbort { path }) => {
                debug!(root = %root.display(), at = %path.display(), "walk aborted by visitor");
            }
            Outcome::Aborted(err) => {
                self.reporter
                    .warn(format_args!("An error occurred traversing {}: {err}", root.display()));
            }
        }

        visitor.end_root(root, &mut self.reporter);
        outcome
    }

    fn drive<V: Visitor>(&mut self, root: &Path, visitor: &mut V) -> Outcome {
        // Handles still open on abort are released when `walk` drops.
        for item in self.walker.walk(root) {
            match item {
                Ok(entry) => {
                    if visitor.visit(&entry, &mut self.reporter) == Flow::Abort {
                        return Outcome::Aborted(WalkError::VisitorAbort { path: entry.path });
                    }
                }
                Err(err) => return Outcome::Aborted(err),
            }
        }
        Outcome::Completed
    }

    pub fn walker(&self) -> &Walker<F> {
        &self.walker
    }

    pub fn reporter(&self) -> &Reporter<E> {
        &self.reporter
    }

    pub fn into_reporter(self) -> Reporter<E> {
        self.reporter
    }
}
