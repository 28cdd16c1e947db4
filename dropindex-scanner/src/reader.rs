//! Directory listing seam.
//!
//! Every read the snapshotter and the change detector perform goes through
//! [`DirectoryReader`], so walks can run against a real tree ([`FsReader`]) or a
//! synthetic one in tests.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::error::{read_err, ScanError};

/// What a directory entry resolves to, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    /// Broken symlinks, sockets, devices, fifos.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Lists the immediate children of a directory, in whatever order the
/// underlying source returns them.
pub trait DirectoryReader {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ScanError>;
}

impl<R: DirectoryReader + ?Sized> DirectoryReader for &R {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ScanError> {
        (**self).read_dir(path)
    }
}

/// [`DirectoryReader`] over `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl DirectoryReader for FsReader {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ScanError> {
        let entries = fs::read_dir(path).map_err(|e| read_err(path, e))?;
        let mut out = Vec::new();
        for entry in entries {
            // An entry that disappears while iterating is simply not listed.
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(err) => {
                    tracing::debug!(
                        path = %entry.path().display(),
                        error = %err,
                        "entry metadata unavailable",
                    );
                    EntryKind::Other
                }
            };
            out.push(DirEntryInfo { name, kind });
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// TimeoutReader
// ---------------------------------------------------------------------------

/// Bounds every `read_dir` of the wrapped reader by `limit`.
///
/// Each read runs on its own thread. A read that overruns is reported as
/// [`ScanError::Timeout`] and left to finish in the background; while it is
/// still outstanding, further reads of the same path fail immediately instead
/// of starting another thread. At most one stuck thread exists per path.
pub struct TimeoutReader<R> {
    inner: Arc<R>,
    limit: Duration,
    outstanding: Arc<Mutex<HashSet<PathBuf>>>,
}

impl<R> TimeoutReader<R> {
    pub fn new(inner: R, limit: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            limit,
            outstanding: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Paths whose timed-out read has not returned yet.
    pub fn outstanding(&self) -> usize {
        self.lock_outstanding().len()
    }

    fn lock_outstanding(&self) -> std::sync::MutexGuard<'_, HashSet<PathBuf>> {
        self.outstanding.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn timeout(&self, path: &Path) -> ScanError {
        ScanError::Timeout {
            path: path.to_path_buf(),
            after: self.limit,
        }
    }
}

impl<R> DirectoryReader for TimeoutReader<R>
where
    R: DirectoryReader + Send + Sync + 'static,
{
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ScanError> {
        if !self.lock_outstanding().insert(path.to_path_buf()) {
            tracing::debug!(path = %path.display(), "previous read still outstanding");
            return Err(self.timeout(path));
        }

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let outstanding = Arc::clone(&self.outstanding);
        let owned = path.to_path_buf();
        let spawned = thread::Builder::new()
            .name("dropindex-read".to_string())
            .spawn(move || {
                let result = inner.read_dir(&owned);
                outstanding
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .remove(&owned);
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            self.lock_outstanding().remove(path);
            return Err(read_err(path, err));
        }

        match rx.recv_timeout(self.limit) {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    after_ms = self.limit.as_millis() as u64,
                    "directory read timed out",
                );
                Err(self.timeout(path))
            }
        }
    }
}
