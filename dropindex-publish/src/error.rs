//! Error types for dropindex-publish.

use std::path::PathBuf;

use thiserror::Error;

use dropindex_renderer::RenderError;

/// Errors that can end one manifest cycle. None of them stop the scheduler.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The output document could not be written.
    #[error("cannot write output {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
