//! Error types for walk operations.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop the traversal of a root.
///
/// Per-entry problems (unreadable directories, failed `lstat` calls) are not
/// errors at this level; the walker reports them as entries and keeps going.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root itself could not be stat'ed.
    #[error("cannot stat root {path}: {source}")]
    RootStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descending would open more directories than allowed.
    #[error("directory depth limit of {limit} exceeded at {path}")]
    DepthExceeded { path: PathBuf, limit: usize },

    /// Reading entries from an already-open directory failed.
    #[error("error reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The visitor asked to stop at this path.
    #[error("traversal aborted at {path}")]
    VisitorAbort { path: PathBuf },
}

impl WalkError {
    /// Create a root stat error with path context.
    pub fn root_stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RootStat {
            path: path.into(),
            source,
        }
    }

    /// Create a directory read error with path context.
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::RootStat { path, .. }
            | Self::DepthExceeded { path, .. }
            | Self::ReadDir { path, .. }
            | Self::VisitorAbort { path } => path,
        }
    }
}
