//! One manifest cycle: snapshot → render → publish.
//!
//! Shared by `dropindex render` (a single cycle) and the daemon's manifest
//! scheduler (one cycle per tick). The steps are exposed separately so the
//! scheduler can run the read-only snapshot under a timeout.

use std::path::Path;

use serde::Serialize;

use dropindex_core::ManifestSettings;
use dropindex_renderer::{DocumentSettings, ManifestRenderer};
use dropindex_scanner::{scan, DirectoryReader, FsReader, ScanIssue, Snapshot};

use crate::error::PublishError;
use crate::writer::{OutputSink, WriteResult};

/// Summary of one completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub categories: usize,
    pub files: usize,
    pub issues: Vec<ScanIssue>,
    pub write: WriteResult,
}

/// Everything needed to run manifest cycles for one drop folder.
pub struct ManifestPipeline<R = FsReader> {
    settings: ManifestSettings,
    doc: DocumentSettings,
    renderer: ManifestRenderer,
    reader: R,
}

impl ManifestPipeline<FsReader> {
    /// Pipeline over the real filesystem.
    pub fn new(settings: ManifestSettings) -> Result<Self, PublishError> {
        Self::with_reader(settings, FsReader)
    }
}

impl<R: DirectoryReader> ManifestPipeline<R> {
    pub fn with_reader(settings: ManifestSettings, reader: R) -> Result<Self, PublishError> {
        let renderer = ManifestRenderer::with_template_dir(settings.template_dir.as_deref())?;
        Ok(Self {
            doc: DocumentSettings::from(&settings),
            settings,
            renderer,
            reader,
        })
    }

    pub fn settings(&self) -> &ManifestSettings {
        &self.settings
    }

    pub fn root(&self) -> &Path {
        &self.settings.root
    }

    /// Walk the drop folder. Never fails; unreadable directories are issues.
    pub fn snapshot(&self) -> Snapshot {
        scan(
            &self.reader,
            &self.settings.root,
            self.settings.shape,
            &self.settings.urgent_marker,
        )
    }

    pub fn render(&self, snapshot: &Snapshot) -> Result<String, PublishError> {
        Ok(self.renderer.render(&snapshot.manifest, &self.doc)?)
    }

    /// Render `snapshot` and hand the document to `sink`.
    pub fn publish(
        &self,
        snapshot: Snapshot,
        sink: &dyn OutputSink,
    ) -> Result<CycleReport, PublishError> {
        let document = self.render(&snapshot)?;
        let write = sink.publish(&document)?;
        Ok(CycleReport {
            categories: snapshot.manifest.categories().len(),
            files: snapshot.manifest.file_count(),
            issues: snapshot.issues,
            write,
        })
    }

    /// A full cycle without a timeout.
    pub fn run_cycle(&self, sink: &dyn OutputSink) -> Result<CycleReport, PublishError> {
        self.publish(self.snapshot(), sink)
    }
}
