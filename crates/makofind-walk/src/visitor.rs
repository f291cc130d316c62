//! Per-entry classification and manifest emission.

use std::io::Write;
use std::path::Path;

use makofind_core::{Entry, EntryKind, ManifestRecord};

use crate::report::Reporter;

/// What the driver should do after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep walking.
    Continue,
    /// Stop the current root.
    Abort,
}

/// Receives every entry of a walk.
pub trait Visitor {
    /// Handle one entry.
    fn visit<E: Write>(&mut self, entry: &Entry, reporter: &mut Reporter<E>) -> Flow;

    /// Called once after each root, whether it completed or aborted.
    fn end_root<E: Write>(&mut self, _root: &Path, _reporter: &mut Reporter<E>) {}
}

/// Error and skip policy for every kind that is not a regular file.
///
/// Directories, symlinks and special files (FIFOs, sockets, devices) pass
/// silently. Unreadable directories and failed stats are reported and the
/// walk continues. An object of unclassifiable type is reported and aborts
/// the root.
pub fn apply_policy<E: Write>(entry: &Entry, reporter: &mut Reporter<E>) -> Flow {
    match entry.kind {
        EntryKind::File | EntryKind::Dir | EntryKind::Symlink | EntryKind::Special => {
            Flow::Continue
        }
        EntryKind::DirUnreadable => {
            reporter.warn(format_args!("Unable to read directory: {}", entry.path.display()));
            Flow::Continue
        }
        EntryKind::StatFailed => {
            reporter.warn(format_args!("stat failed at {}", entry.path.display()));
            Flow::Continue
        }
        EntryKind::Unknown => {
            let kind = entry.stat.map(|s| s.kind.to_string()).unwrap_or_default();
            reporter.warn(format_args!("{}: unknown type ({kind})", entry.path.display()));
            Flow::Abort
        }
    }
}

/// Writes one manifest line per regular file.
///
/// Record and byte counters only cover lines written before the first output
/// error. Behind a buffered writer an error surfaces on whichever later write
/// or flush hits it, so lines counted earlier may still have been lost; the
/// run is marked failed either way.
#[derive(Debug)]
pub struct ManifestVisitor<W> {
    out: W,
    write_failed: bool,
}

impl<W: Write> ManifestVisitor<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_failed: false,
        }
    }

    /// Whether any write or flush to the output has failed.
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Visitor for ManifestVisitor<W> {
    fn visit<E: Write>(&mut self, entry: &Entry, reporter: &mut Reporter<E>) -> Flow {
        let Some(record) = ManifestRecord::from_entry(entry) else {
            return apply_policy(entry, reporter);
        };

        // A failed write loses this record; the walk goes on.
        match record.write_to(&mut self.out) {
            Ok(()) if !self.write_failed => reporter.record_emitted(record.size),
            Ok(()) => {}
            Err(err) => {
                self.write_failed = true;
                reporter.warn(format_args!(
                    "Failed to print information for: {}: {err}",
                    record.path.display()
                ));
            }
        }
        Flow::Continue
    }

    fn end_root<E: Write>(&mut self, root: &Path, reporter: &mut Reporter<E>) {
        if let Err(err) = self.out.flush() {
            self.write_failed = true;
            reporter.warn(format_args!(
                "Failed to flush manifest for {}: {err}",
                root.display()
            ));
        }
    }
}
