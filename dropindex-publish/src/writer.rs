//! Output sinks and the atomic document writer.
//!
//! ## `atomic_write` protocol
//!
//! 1. Normalise line endings to LF.
//! 2. Write to `<path>.dropindex.tmp` in the same directory.
//! 3. Rename to the final path (atomic on POSIX), so a browser reloading the
//!    page never sees a half-written document.
//!
//! The document is rewritten in full on every cycle. [`FileSink`] remembers the
//! SHA-256 of the last published document only to tell the caller whether the
//! content changed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{io_err, PublishError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of publishing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub path: PathBuf,
    pub bytes: usize,
    /// `false` when the content equals the previously published document.
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// OutputSink
// ---------------------------------------------------------------------------

/// Destination of the rendered manifest.
pub trait OutputSink: Send + Sync {
    fn publish(&self, document: &str) -> Result<WriteResult, PublishError>;
}

/// Writes the document to a file with overwrite semantics.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    last_digest: Mutex<Option<String>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_digest: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn publish(&self, document: &str) -> Result<WriteResult, PublishError> {
        let normalized = document.replace("\r\n", "\n");
        let digest = {
            let mut h = Sha256::new();
            h.update(normalized.as_bytes());
            hex::encode(h.finalize())
        };

        atomic_write(&self.path, &normalized)?;

        let mut last = self
            .last_digest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let changed = last.as_deref() != Some(digest.as_str());
        *last = Some(digest);

        if changed {
            tracing::info!(path = %self.path.display(), bytes = normalized.len(), "manifest updated");
        } else {
            tracing::debug!(path = %self.path.display(), "manifest rewritten, content unchanged");
        }
        Ok(WriteResult {
            path: self.path.clone(),
            bytes: normalized.len(),
            changed,
        })
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically replace `path` with `content`.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), PublishError> {
    let tmp = tmp_path(path);
    atomic_write_with_tmp(path, content, &tmp)
}

/// `<path>.dropindex.tmp`
pub fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.dropindex.tmp", path.display()))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), PublishError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_publish_is_a_change() {
        let tmp = TempDir::new().unwrap();
        let sink = FileSink::new(tmp.path().join("index.html"));
        let result = sink.publish("<html></html>").unwrap();
        assert!(result.changed);
        assert_eq!(result.bytes, 13);
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "<html></html>");
    }

    #[test]
    fn same_content_is_rewritten_but_not_a_change() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");
        let sink = FileSink::new(&path);
        sink.publish("v1").unwrap();

        // Someone clobbers the file between cycles; the next cycle restores it.
        fs::write(&path, "garbage").unwrap();
        let result = sink.publish("v1").unwrap();
        assert!(!result.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "v1");
    }

    #[test]
    fn changed_content_is_a_change() {
        let tmp = TempDir::new().unwrap();
        let sink = FileSink::new(tmp.path().join("index.html"));
        sink.publish("v1").unwrap();
        assert!(sink.publish("v2").unwrap().changed);
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.html");
        atomic_write(&path, "data").unwrap();
        assert!(!tmp_path(&path).exists(), ".dropindex.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("www").join("hospital").join("index.html");
        atomic_write(&path, "content").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn crlf_is_normalised() {
        let tmp = TempDir::new().unwrap();
        let sink = FileSink::new(tmp.path().join("index.html"));
        sink.publish("line1\r\nline2\r\n").unwrap();
        assert!(!sink.publish("line1\nline2\n").unwrap().changed);
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "line1\nline2\n");
    }

    #[test]
    fn unwritable_target_reports_path() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should go makes the rename fail.
        let path = tmp.path().join("index.html");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let err = atomic_write(&path, "content").unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
        assert!(err.to_string().contains("index.html"));
        assert!(!tmp_path(&path).exists(), "tmp must be cleaned up after a failed rename");
    }
}
