//! In-memory filesystem for exercising device boundaries, stat failures and
//! unreadable directories without root privileges or real mounts.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use makofind_walk::{FileKind, Filesystem, Stat, Timestamp};

#[derive(Debug, Clone)]
enum Node {
    Object(Stat),
    Dir {
        stat: Stat,
        children: Vec<OsString>,
        unreadable: bool,
        fail_after: Option<usize>,
    },
    StatError,
}

#[derive(Debug, Default)]
struct Handles {
    open: Cell<usize>,
    peak: Cell<usize>,
}

#[derive(Debug, Default)]
pub struct MemFs {
    nodes: HashMap<PathBuf, Node>,
    handles: Rc<Handles>,
}

fn stat(kind: FileKind, size: u64, blocks: u64, device: u64) -> Stat {
    Stat {
        size,
        modified: Timestamp::new(1_700_000_000, 123_456_789),
        blocks,
        device,
        kind,
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, path: &str, node: Node) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            if let Some(Node::Dir { children, .. }) = self.nodes.get_mut(parent) {
                children.push(path.file_name().unwrap().to_os_string());
            }
        }
        self.nodes.insert(path, node);
    }

    pub fn dir(mut self, path: &str, device: u64) -> Self {
        self.insert(
            path,
            Node::Dir {
                stat: stat(FileKind::Dir, 4096, 8, device),
                children: Vec::new(),
                unreadable: false,
                fail_after: None,
            },
        );
        self
    }

    pub fn unreadable_dir(mut self, path: &str, device: u64) -> Self {
        self.insert(
            path,
            Node::Dir {
                stat: stat(FileKind::Dir, 4096, 8, device),
                children: Vec::new(),
                unreadable: true,
                fail_after: None,
            },
        );
        self
    }

    /// Directory whose listing fails after `after` names.
    pub fn failing_dir(mut self, path: &str, device: u64, after: usize) -> Self {
        self.insert(
            path,
            Node::Dir {
                stat: stat(FileKind::Dir, 4096, 8, device),
                children: Vec::new(),
                unreadable: false,
                fail_after: Some(after),
            },
        );
        self
    }

    pub fn file(mut self, path: &str, size: u64, blocks: u64, device: u64) -> Self {
        self.insert(path, Node::Object(stat(FileKind::File, size, blocks, device)));
        self
    }

    pub fn symlink(mut self, path: &str, device: u64) -> Self {
        self.insert(path, Node::Object(stat(FileKind::Symlink, 10, 0, device)));
        self
    }

    pub fn fifo(mut self, path: &str, device: u64) -> Self {
        self.insert(path, Node::Object(stat(FileKind::Fifo, 0, 0, device)));
        self
    }

    /// Object whose type `lstat` could not classify.
    pub fn untyped(mut self, path: &str, device: u64) -> Self {
        self.insert(path, Node::Object(stat(FileKind::Other, 0, 0, device)));
        self
    }

    pub fn stat_error(mut self, path: &str) -> Self {
        self.insert(path, Node::StatError);
        self
    }

    pub fn open_handles(&self) -> usize {
        self.handles.open.get()
    }

    pub fn peak_handles(&self) -> usize {
        self.handles.peak.get()
    }
}

pub struct MemDir {
    names: std::vec::IntoIter<OsString>,
    yielded: usize,
    fail_after: Option<usize>,
    handles: Rc<Handles>,
}

impl Iterator for MemDir {
    type Item = io::Result<OsString>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fail_after == Some(self.yielded) {
            self.fail_after = None;
            return Some(Err(io::Error::other("device went away")));
        }
        self.yielded += 1;
        self.names.next().map(Ok)
    }
}

impl Drop for MemDir {
    fn drop(&mut self) {
        self.handles.open.set(self.handles.open.get() - 1);
    }
}

impl Filesystem for MemFs {
    type Dir = MemDir;

    fn lstat(&self, path: &Path) -> io::Result<Stat> {
        match self.nodes.get(path) {
            Some(Node::Object(stat)) | Some(Node::Dir { stat, .. }) => Ok(*stat),
            Some(Node::StatError) => Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such entry")),
        }
    }

    fn open_dir(&self, path: &Path) -> io::Result<MemDir> {
        match self.nodes.get(path) {
            Some(Node::Dir {
                children,
                unreadable: false,
                fail_after,
                ..
            }) => {
                let open = self.handles.open.get() + 1;
                self.handles.open.set(open);
                self.handles.peak.set(self.handles.peak.get().max(open));
                Ok(MemDir {
                    names: children.clone().into_iter(),
                    yielded: 0,
                    fail_after: *fail_after,
                    handles: Rc::clone(&self.handles),
                })
            }
            Some(Node::Dir { .. }) => Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            _ => Err(io::Error::new(io::ErrorKind::NotADirectory, "not a directory")),
        }
    }
}
