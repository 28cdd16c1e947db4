//! Notification scheduler: polls one folder and raises an alert for every
//! batch of names it has never seen before.
//!
//! Delivery is awaited before the next sleep starts, so while an alert waits
//! for acknowledgement the folder is not polled. Names that arrive meanwhile
//! are reported together on the first cycle after acknowledgement.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::broadcast;

use dropindex_core::NotifierSettings;
use dropindex_scanner::{
    read_listing, ChangeDelta, ChangeDetector, DetectorState, DirectoryReader, FsReader, ScanError,
    TimeoutReader,
};

use crate::error::DaemonError;
use crate::sink::{sink_for, Acknowledgement, Notification, NotificationSink};

/// Source of alert timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// What one cycle saw and how its alert ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub delta: ChangeDelta,
    /// `None` when nothing was new.
    pub acknowledgement: Option<Acknowledgement>,
}

pub struct NotificationScheduler<R = FsReader> {
    folder: PathBuf,
    heading: String,
    interval: Duration,
    prime_existing: bool,
    reader: Arc<TimeoutReader<R>>,
    detector: ChangeDetector,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl NotificationScheduler<FsReader> {
    /// Scheduler over the real filesystem with the sink the settings select.
    pub fn from_settings(settings: &NotifierSettings, read_timeout: Duration) -> Self {
        Self::new(settings, FsReader, sink_for(settings), read_timeout)
    }
}

impl<R> NotificationScheduler<R>
where
    R: DirectoryReader + Send + Sync + 'static,
{
    /// `reader` is wrapped so that each listing is bounded by `read_timeout`.
    pub fn new(
        settings: &NotifierSettings,
        reader: R,
        sink: Arc<dyn NotificationSink>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            folder: settings.watch_folder.clone(),
            heading: settings.alert_heading.clone(),
            interval: settings.interval(),
            prime_existing: settings.prime_existing,
            reader: Arc::new(TimeoutReader::new(reader, read_timeout)),
            detector: ChangeDetector::new(),
            sink,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn state(&self) -> &DetectorState {
        self.detector.state()
    }

    async fn listing(&self) -> Result<Result<Vec<String>, ScanError>, DaemonError> {
        let reader = Arc::clone(&self.reader);
        let folder = self.folder.clone();
        tokio::task::spawn_blocking(move || read_listing(reader.as_ref(), &folder))
            .await
            .map_err(|err| DaemonError::Join(format!("listing of {}: {err}", self.folder.display())))
    }

    /// Mark everything currently in the folder as seen. Returns how many
    /// names were absorbed.
    pub async fn prime(&mut self) -> Result<usize, DaemonError> {
        let listing = self.listing().await?;
        Ok(self.detector.observe(listing).len())
    }

    /// Poll once and update the seen-set. Returns the alert to deliver, if any.
    pub async fn detect(&mut self) -> Result<Option<Notification>, DaemonError> {
        let listing = self.listing().await?;
        let delta = self.detector.observe(listing);
        if delta.is_empty() {
            return Ok(None);
        }
        tracing::info!(
            folder = %self.folder.display(),
            count = delta.len(),
            files = ?delta.iter().collect::<Vec<_>>(),
            "new files detected",
        );
        Ok(Some(Notification {
            timestamp: self.clock.now(),
            folder: self.folder.clone(),
            heading: self.heading.clone(),
            files: delta.into_vec(),
        }))
    }

    /// Hand `notification` to the sink and wait until it is acknowledged.
    pub async fn deliver(&self, notification: Notification) -> Result<Acknowledgement, DaemonError> {
        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || sink.notify(&notification))
            .await
            .map_err(|err| DaemonError::Join(format!("notification delivery: {err}")))?
    }

    /// Detect then deliver.
    pub async fn run_cycle(&mut self) -> Result<NotifyOutcome, DaemonError> {
        let Some(notification) = self.detect().await? else {
            return Ok(NotifyOutcome {
                delta: ChangeDelta::default(),
                acknowledgement: None,
            });
        };
        let delta: ChangeDelta = notification.files.iter().cloned().collect();
        let ack = self.deliver(notification).await?;
        Ok(NotifyOutcome {
            delta,
            acknowledgement: Some(ack),
        })
    }

    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<(), DaemonError> {
        let folder = self.folder.display().to_string();
        tracing::info!(
            folder = %folder,
            interval_secs = self.interval.as_secs(),
            prime_existing = self.prime_existing,
            "notification scheduler started",
        );

        if self.prime_existing {
            match self.prime().await {
                Ok(primed) => tracing::info!(folder = %folder, primed, "existing entries marked as seen"),
                Err(err) => tracing::error!(folder = %folder, error = %err, "priming failed"),
            }
        }

        loop {
            match self.detect().await {
                Ok(Some(notification)) => {
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        ack = self.deliver(notification) => match ack {
                            Ok(ack) => tracing::info!(folder = %folder, ?ack, "alert acknowledged"),
                            Err(err) => tracing::error!(folder = %folder, error = %err, "alert delivery failed"),
                        },
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::error!(folder = %folder, error = %err, "notification cycle failed"),
            }

            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(folder = %folder, "notification scheduler stopped");
        Ok(())
    }
}
