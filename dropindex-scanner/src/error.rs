//! Error types for dropindex-scanner.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A directory could not be read. Always recovered locally: the affected
/// subtree (or notifier cycle) is treated as empty.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Missing, unreadable, or vanished mid-walk.
    #[error("cannot read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The read did not finish within the configured timeout.
    #[error("reading directory {path} timed out after {after:?}")]
    Timeout { path: PathBuf, after: Duration },
}

impl ScanError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanError::DirectoryRead { path, .. } | ScanError::Timeout { path, .. } => path,
        }
    }
}

pub(crate) fn read_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScanError {
    ScanError::DirectoryRead {
        path: path.into(),
        source,
    }
}
