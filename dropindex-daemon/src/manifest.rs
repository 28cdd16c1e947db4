//! Manifest scheduler: one snapshot/render/publish cycle per interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use dropindex_core::ManifestSettings;
use dropindex_publish::{CycleReport, FileSink, ManifestPipeline, OutputSink};
use dropindex_scanner::{DirectoryReader, FsReader, TimeoutReader};

use crate::error::DaemonError;

pub struct ManifestScheduler<R = TimeoutReader<FsReader>> {
    pipeline: Arc<ManifestPipeline<R>>,
    sink: Arc<dyn OutputSink>,
    interval: Duration,
}

impl ManifestScheduler<TimeoutReader<FsReader>> {
    /// Scheduler over the real filesystem, publishing to the configured output.
    /// Every directory read is bounded by `read_timeout`.
    pub fn from_settings(
        settings: ManifestSettings,
        read_timeout: Duration,
    ) -> Result<Self, DaemonError> {
        let sink = Arc::new(FileSink::new(settings.output_path()));
        let reader = TimeoutReader::new(FsReader, read_timeout);
        let pipeline = ManifestPipeline::with_reader(settings, reader)?;
        Ok(Self::new(pipeline, sink))
    }
}

impl<R> ManifestScheduler<R>
where
    R: DirectoryReader + Send + Sync + 'static,
{
    pub fn new(pipeline: ManifestPipeline<R>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            interval: pipeline.settings().interval(),
            pipeline: Arc::new(pipeline),
            sink,
        }
    }

    /// Override the sleep between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One cycle on the blocking pool. A directory whose read times out
    /// contributes nothing and shows up in [`CycleReport::issues`]; the rest of
    /// the tree is still published.
    pub async fn run_cycle(&self) -> Result<CycleReport, DaemonError> {
        let pipeline = Arc::clone(&self.pipeline);
        let sink = Arc::clone(&self.sink);
        let report = tokio::task::spawn_blocking(move || pipeline.run_cycle(sink.as_ref()))
            .await
            .map_err(|err| DaemonError::Join(format!("manifest cycle: {err}")))??;
        Ok(report)
    }

    /// Cycle, sleep, repeat until shutdown. Cycle errors are logged and the
    /// loop carries on.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<(), DaemonError> {
        let root = self.pipeline.root().display().to_string();
        tracing::info!(
            root = %root,
            output = %self.pipeline.settings().output_path().display(),
            interval_secs = self.interval.as_secs(),
            "manifest scheduler started",
        );

        loop {
            match self.run_cycle().await {
                Ok(report) => tracing::debug!(
                    root = %root,
                    categories = report.categories,
                    files = report.files,
                    issues = report.issues.len(),
                    changed = report.write.changed,
                    "manifest cycle complete",
                ),
                Err(err) => tracing::error!(root = %root, error = %err, "manifest cycle failed"),
            }

            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(root = %root, "manifest scheduler stopped");
        Ok(())
    }
}
