//! Filesystem access used by the walker.

use std::ffi::OsString;
use std::fs::{self, ReadDir};
use std::io;
use std::path::Path;

use makofind_core::Stat;

/// The two operations a walk needs: `lstat` and opening a directory.
///
/// Every open directory handle holds one OS descriptor for as long as it is
/// alive, so dropping a handle must release it.
pub trait Filesystem {
    /// Open directory handle yielding the names of its entries
    /// (without `.` and `..`).
    type Dir: Iterator<Item = io::Result<OsString>>;

    /// Stat a path without following a trailing symlink.
    fn lstat(&self, path: &Path) -> io::Result<Stat>;

    /// Open a directory for reading.
    fn open_dir(&self, path: &Path) -> io::Result<Self::Dir>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    type Dir = OsDir;

    fn lstat(&self, path: &Path) -> io::Result<Stat> {
        fs::symlink_metadata(path).map(|m| Stat::from_metadata(&m))
    }

    fn open_dir(&self, path: &Path) -> io::Result<OsDir> {
        fs::read_dir(path).map(OsDir)
    }
}

/// An open directory on the real filesystem.
#[derive(Debug)]
pub struct OsDir(ReadDir);

impl Iterator for OsDir {
    type Item = io::Result<OsString>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| entry.map(|e| e.file_name()))
    }
}
