//! Filesystem snapshotter: walks a drop folder into a [`Manifest`].
//!
//! `scan(reader, root, shape, marker)` reads at most three directory levels:
//!
//! ```text
//! nested: root/<MARKER>/<file>         root/<category>/<group>/<file>
//! flat:   root/<MARKER>/<file>         root/<group>/<file>
//! ```
//!
//! The walk never fails as a whole. A directory that cannot be listed
//! contributes nothing and is reported as a [`ScanIssue`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use dropindex_core::{Category, FileEntry, Group, HierarchyShape, Manifest, UrgentMarker};

use crate::error::ScanError;
use crate::reader::{DirEntryInfo, DirectoryReader};

/// One directory the walk could not list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub message: String,
}

impl From<&ScanError> for ScanIssue {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result of one walk: the model plus whatever went wrong along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub manifest: Manifest,
    pub issues: Vec<ScanIssue>,
}

impl Snapshot {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Walk `root` and build a manifest with the urgent category first.
pub fn scan<R: DirectoryReader>(
    reader: &R,
    root: &Path,
    shape: HierarchyShape,
    marker: &UrgentMarker,
) -> Snapshot {
    let mut walk = Walk {
        reader,
        issues: Vec::new(),
    };
    let mut manifest = Manifest::new(shape);

    for name in walk.subdirs(root) {
        let path = root.join(&name);
        let category = if marker.matches(&name) {
            Category::urgent(name, walk.files(&path))
        } else {
            match shape {
                HierarchyShape::Nested => {
                    let groups = walk
                        .subdirs(&path)
                        .into_iter()
                        .map(|group| {
                            let files = walk.files(&path.join(&group));
                            Group::new(group, files)
                        })
                        .collect();
                    Category::grouped(name, groups)
                }
                HierarchyShape::Flat => Category::flat(name, walk.files(&path)),
            }
        };
        manifest.push_category(category);
    }

    tracing::debug!(
        root = %root.display(),
        categories = manifest.categories().len(),
        files = manifest.file_count(),
        issues = walk.issues.len(),
        "snapshot complete",
    );

    Snapshot {
        manifest,
        issues: walk.issues,
    }
}

struct Walk<'r, R> {
    reader: &'r R,
    issues: Vec<ScanIssue>,
}

impl<R: DirectoryReader> Walk<'_, R> {
    fn list(&mut self, path: &Path) -> Vec<DirEntryInfo> {
        match self.reader.read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "directory unreadable, treating as empty");
                self.issues.push(ScanIssue::from(&err));
                Vec::new()
            }
        }
    }

    fn subdirs(&mut self, path: &Path) -> Vec<String> {
        self.list(path)
            .into_iter()
            .filter(DirEntryInfo::is_dir)
            .map(|e| e.name)
            .collect()
    }

    fn files(&mut self, path: &Path) -> Vec<FileEntry> {
        self.list(path)
            .into_iter()
            .filter(DirEntryInfo::is_file)
            .map(|e| FileEntry::from(e.name))
            .collect()
    }
}
