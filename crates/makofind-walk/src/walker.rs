//! Depth-first, device-confined traversal.

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use makofind_core::{Entry, EntryKind, FileKind, Stat, WalkConfig, WalkError};

use crate::fs::{Filesystem, OsFilesystem};
use crate::mount::same_device;
use crate::stack::DirStack;

/// Creates walks over roots with a shared configuration.
#[derive(Debug, Clone)]
pub struct Walker<F = OsFilesystem> {
    fs: F,
    config: WalkConfig,
}

impl Walker<OsFilesystem> {
    /// Create a walker over the real filesystem.
    pub fn new(config: WalkConfig) -> Self {
        Self::with_filesystem(OsFilesystem, config)
    }
}

impl<F: Filesystem> Walker<F> {
    /// Create a walker over a custom filesystem.
    pub fn with_filesystem(fs: F, config: WalkConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Start a walk of `root`. Nothing is touched until the first `next()`.
    pub fn walk(&self, root: impl AsRef<Path>) -> Walk<'_, F> {
        Walk {
            fs: &self.fs,
            root: Some(root.as_ref().to_path_buf()),
            root_device: 0,
            stack: DirStack::new(self.config.max_open_dirs),
            done: false,
        }
    }
}

/// One open directory being read.
struct Frame<D> {
    path: PathBuf,
    dir: D,
}

enum Step {
    Ascend,
    Child(PathBuf),
    Fail(WalkError),
}

/// Lazy pre-order walk of a single root.
///
/// Yields each visited object once. Directories come before their contents
/// and all of a directory's descendants come before the walk leaves it.
/// After an `Err` the walk is finished and every open handle is released.
pub struct Walk<'a, F: Filesystem> {
    fs: &'a F,
    /// Taken on the first call to `next()`.
    root: Option<PathBuf>,
    root_device: u64,
    stack: DirStack<Frame<F::Dir>>,
    done: bool,
}

impl<F: Filesystem> Walk<'_, F> {
    /// Number of directory handles currently open.
    pub fn open_dirs(&self) -> usize {
        self.stack.len()
    }

    fn start(&mut self, root: PathBuf) -> Option<Result<Entry, WalkError>> {
        match self.fs.lstat(&root) {
            Ok(stat) => {
                self.root_device = stat.device;
                debug!(root = %root.display(), device = stat.device, "starting walk");
                self.classify(root, stat, 0)
            }
            Err(err) => self.fail(WalkError::root_stat(root, err)),
        }
    }

    fn visit_child(&mut self, path: PathBuf, depth: usize) -> Option<Result<Entry, WalkError>> {
        let stat = match self.fs.lstat(&path) {
            Ok(stat) => stat,
            Err(err) => {
                trace!(path = %path.display(), error = %err, "lstat failed");
                return Some(Ok(Entry::stat_failed(path, depth)));
            }
        };

        if !same_device(self.root_device, stat.device) {
            debug!(path = %path.display(), device = stat.device, "skipping entry on another device");
            return None;
        }

        self.classify(path, stat, depth)
    }

    fn classify(&mut self, path: PathBuf, stat: Stat, depth: usize) -> Option<Result<Entry, WalkError>> {
        let kind = match stat.kind {
            FileKind::File => EntryKind::File,
            FileKind::Symlink => EntryKind::Symlink,
            FileKind::Fifo | FileKind::Socket | FileKind::BlockDevice | FileKind::CharDevice => {
                EntryKind::Special
            }
            FileKind::Other => EntryKind::Unknown,
            FileKind::Dir => return self.descend(path, stat, depth),
        };
        Some(Ok(Entry::new(path, stat, kind, depth)))
    }

    fn descend(&mut self, path: PathBuf, stat: Stat, depth: usize) -> Option<Result<Entry, WalkError>> {
        // Check before opening so the bound holds for descriptors too.
        if self.stack.is_full() {
            let limit = self.stack.capacity();
            debug!(path = %path.display(), limit, "directory depth limit reached");
            return self.fail(WalkError::DepthExceeded { path, limit });
        }

        let dir = match self.fs.open_dir(&path) {
            Ok(dir) => dir,
            Err(err) => {
                trace!(path = %path.display(), error = %err, "cannot open directory");
                return Some(Ok(Entry::new(path, stat, EntryKind::DirUnreadable, depth)));
            }
        };

        let frame = Frame {
            path: path.clone(),
            dir,
        };
        if self.stack.push(frame).is_err() {
            let limit = self.stack.capacity();
            return self.fail(WalkError::DepthExceeded { path, limit });
        }
        trace!(path = %path.display(), open = self.stack.len(), "descended");

        Some(Ok(Entry::new(path, stat, EntryKind::Dir, depth)))
    }

    fn fail(&mut self, err: WalkError) -> Option<Result<Entry, WalkError>> {
        self.done = true;
        self.stack.clear();
        Some(Err(err))
    }
}

impl<F: Filesystem> Iterator for Walk<'_, F> {
    type Item = Result<Entry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(root) = self.root.take() {
            let item = self.start(root);
            if self.stack.is_empty() {
                self.done = true;
            }
            return item;
        }

        loop {
            let depth = self.stack.len();
            let step = match self.stack.top_mut() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(frame) => match frame.dir.next() {
                    None => Step::Ascend,
                    Some(Ok(name)) => Step::Child(frame.path.join(name)),
                    Some(Err(err)) => Step::Fail(WalkError::read_dir(frame.path.clone(), err)),
                },
            };

            match step {
                Step::Ascend => {
                    if let Some(frame) = self.stack.pop() {
                        trace!(path = %frame.path.display(), "ascended");
                    }
                }
                Step::Child(path) => {
                    if let Some(item) = self.visit_child(path, depth) {
                        return Some(item);
                    }
                }
                Step::Fail(err) => return self.fail(err),
            }
        }
    }
}

impl<F: Filesystem> FusedIterator for Walk<'_, F> {}
