//! Manifest records and their line layout.
//!
//! A manifest line is
//!
//! ```text
//! <path>\t<size>\t<mtime secs>.<mtime nanos, 9 digits>0\t<physical KiB>\n
//! ```
//!
//! The trailing `0` after the nanoseconds matches the fractional timestamps
//! printed by GNU find, which manifest consumers already parse.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, Timestamp};

/// Physical footprint in 1 KiB units from a count of 512-byte blocks,
/// rounded up.
pub fn physical_kb(blocks: u64) -> u64 {
    blocks / 2 + blocks % 2
}

/// Renders a timestamp the way it appears in the manifest.
#[derive(Debug, Clone, Copy)]
pub struct ManifestTime(pub Timestamp);

impl fmt::Display for ManifestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}0", self.0.secs, self.0.nanos)
    }
}

/// One manifest line, describing a regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Path as encountered during the walk.
    pub path: PathBuf,
    /// Logical size in bytes.
    pub size: u64,
    /// Last data modification.
    pub modified: Timestamp,
    /// Allocated size in KiB.
    pub physical_kb: u64,
}

impl ManifestRecord {
    /// Build a record for a regular-file entry. Returns `None` for anything else.
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        if !entry.is_file() {
            return None;
        }
        let stat = entry.stat.as_ref()?;
        Some(Self {
            path: entry.path.clone(),
            size: stat.size,
            modified: stat.modified,
            physical_kb: physical_kb(stat.blocks),
        })
    }

    /// Write the record as one newline-terminated manifest line.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write_path(out, &self.path)?;
        writeln!(
            out,
            "\t{}\t{}\t{}",
            self.size,
            ManifestTime(self.modified),
            self.physical_kb
        )
    }

    /// Render the record as a string (lossy for non-UTF-8 paths).
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.path.to_string_lossy(),
            self.size,
            ManifestTime(self.modified),
            self.physical_kb
        )
    }
}

#[cfg(unix)]
fn write_path<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    out.write_all(path.to_string_lossy().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryKind, FileKind, Stat};

    fn file_entry(path: &str, size: u64, blocks: u64, modified: Timestamp) -> Entry {
        Entry::new(
            path,
            Stat {
                size,
                modified,
                blocks,
                device: 1,
                kind: FileKind::File,
            },
            EntryKind::File,
            2,
        )
    }

    #[test]
    fn test_physical_kb_rounds_up() {
        assert_eq!(physical_kb(0), 0);
        assert_eq!(physical_kb(1), 1);
        assert_eq!(physical_kb(2), 1);
        assert_eq!(physical_kb(3), 2);
        assert_eq!(physical_kb(2049), 1025);
        assert_eq!(physical_kb(u64::MAX), u64::MAX / 2 + 1);
    }

    #[test]
    fn test_manifest_time_trailing_zero() {
        let t = ManifestTime(Timestamp::new(1_700_000_000, 123_456_789));
        assert_eq!(t.to_string(), "1700000000.1234567890");

        let t = ManifestTime(Timestamp::new(42, 5));
        assert_eq!(t.to_string(), "42.0000000050");
    }

    #[test]
    fn test_write_line() {
        let entry = file_entry(
            "/manta/acct-1/obj-42",
            1_048_576,
            2049,
            Timestamp::new(1_700_000_000, 123_456_789),
        );
        let record = ManifestRecord::from_entry(&entry).unwrap();

        let mut out = Vec::new();
        record.write_to(&mut out).unwrap();
        assert_eq!(
            out,
            b"/manta/acct-1/obj-42\t1048576\t1700000000.1234567890\t1025\n"
        );
        assert_eq!(record.to_line().as_bytes(), out.as_slice());
    }

    #[test]
    fn test_non_file_has_no_record() {
        let mut entry = file_entry("/manta", 4096, 8, Timestamp::new(0, 0));
        entry.kind = EntryKind::Dir;
        assert!(ManifestRecord::from_entry(&entry).is_none());

        let failed = Entry::stat_failed("/manta/x", 1);
        assert!(ManifestRecord::from_entry(&failed).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_written_raw() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/m/\xff"));
        let record = ManifestRecord {
            path,
            size: 1,
            modified: Timestamp::new(1, 0),
            physical_kb: 1,
        };
        let mut out = Vec::new();
        record.write_to(&mut out).unwrap();
        assert_eq!(out, b"/m/\xff\t1\t1.0000000000\t1\n");
    }
}
