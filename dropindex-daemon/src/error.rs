use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the schedulers, notification sinks and runtime.
///
/// Per-cycle errors (`Publish`, `Sink`) are logged by the scheduler
/// loops and never end them. Only startup errors escape [`crate::run`].
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] dropindex_core::ConfigError),

    #[error("publish error: {0}")]
    Publish(#[from] dropindex_publish::PublishError),

    #[error("notification sink failed: {0}")]
    Sink(String),

    #[error("task join failure: {0}")]
    Join(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
