//! Directory entries and their stat snapshots.

use std::fs::{FileType, Metadata};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Modification time as whole seconds plus nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch (negative before it).
    pub secs: i64,
    /// Nanoseconds within the second, always below 1e9.
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp from seconds and nanoseconds.
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    /// Convert a `SystemTime`, flooring pre-epoch times to the previous second.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self::new(d.as_secs() as i64, d.subsec_nanos()),
            Err(err) => {
                let d = err.duration();
                let secs = -(d.as_secs() as i64);
                match d.subsec_nanos() {
                    0 => Self::new(secs, 0),
                    n => Self::new(secs - 1, 1_000_000_000 - n),
                }
            }
        }
    }
}

/// Raw object type as reported by `lstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum FileKind {
    File,
    Dir,
    Symlink,
    Fifo,
    Socket,
    BlockDevice,
    CharDevice,
    /// A type `lstat` reported that none of the above describes.
    Other,
}

impl FileKind {
    /// FIFOs, sockets and device nodes.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            FileKind::Fifo | FileKind::Socket | FileKind::BlockDevice | FileKind::CharDevice
        )
    }
}

impl From<FileType> for FileKind {
    fn from(ft: FileType) -> Self {
        if ft.is_file() {
            FileKind::File
        } else if ft.is_dir() {
            FileKind::Dir
        } else if ft.is_symlink() {
            FileKind::Symlink
        } else {
            special_kind(ft)
        }
    }
}

#[cfg(unix)]
fn special_kind(ft: FileType) -> FileKind {
    if ft.is_fifo() {
        FileKind::Fifo
    } else if ft.is_socket() {
        FileKind::Socket
    } else if ft.is_block_device() {
        FileKind::BlockDevice
    } else if ft.is_char_device() {
        FileKind::CharDevice
    } else {
        FileKind::Other
    }
}

#[cfg(not(unix))]
fn special_kind(_ft: FileType) -> FileKind {
    FileKind::Other
}

/// Snapshot of the stat fields the manifest needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Logical size in bytes.
    pub size: u64,
    /// Last data modification.
    pub modified: Timestamp,
    /// Allocated 512-byte blocks.
    pub blocks: u64,
    /// Device the object lives on.
    pub device: u64,
    /// Raw object type.
    pub kind: FileKind,
}

impl Stat {
    /// Capture a snapshot from `symlink_metadata` output.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: get_mtime(metadata),
            blocks: get_blocks(metadata),
            device: get_dev(metadata),
            kind: metadata.file_type().into(),
        }
    }
}

/// Classification of a visited object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory that was opened for reading.
    Dir,
    /// Symbolic link, never followed.
    Symlink,
    /// Directory that could not be opened.
    DirUnreadable,
    /// `lstat` failed; no snapshot is available.
    StatFailed,
    /// FIFO, socket or device node. Listed nowhere, never descended.
    Special,
    /// Object of a type that could not be classified at all.
    Unknown,
}

/// An object encountered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path as encountered: the root as given, children joined onto it.
    pub path: PathBuf,
    /// Stat snapshot, absent when `kind` is `StatFailed`.
    pub stat: Option<Stat>,
    /// Classification.
    pub kind: EntryKind,
    /// Depth below the root (the root is 0).
    pub depth: usize,
}

impl Entry {
    /// Create an entry for an object that was stat'ed successfully.
    pub fn new(path: impl Into<PathBuf>, stat: Stat, kind: EntryKind, depth: usize) -> Self {
        Self {
            path: path.into(),
            stat: Some(stat),
            kind,
            depth,
        }
    }

    /// Create an entry for an object whose `lstat` failed.
    pub fn stat_failed(path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            path: path.into(),
            stat: None,
            kind: EntryKind::StatFailed,
            depth,
        }
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

// Cross-platform metadata helpers

#[cfg(unix)]
fn get_mtime(metadata: &Metadata) -> Timestamp {
    Timestamp::new(metadata.mtime(), u32::try_from(metadata.mtime_nsec()).unwrap_or(0))
}

#[cfg(not(unix))]
fn get_mtime(metadata: &Metadata) -> Timestamp {
    Timestamp::from_system_time(metadata.modified().unwrap_or(UNIX_EPOCH))
}

#[cfg(unix)]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.blocks()
}

#[cfg(not(unix))]
fn get_blocks(metadata: &Metadata) -> u64 {
    // Estimate blocks from file size (512-byte blocks, rounded up)
    metadata.len().div_ceil(512)
}

#[cfg(unix)]
fn get_dev(metadata: &Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &Metadata) -> u64 {
    0
}
