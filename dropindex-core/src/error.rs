//! Error types for dropindex-core.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration errors. All of them are fatal: the process reports
/// the error once and exits before any scheduler starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// `dirs::config_dir()` returned `None`.
    #[error("cannot determine the user config directory; pass --config explicitly")]
    ConfigDirNotFound,

    /// A manifest root or watch folder is missing or not a directory.
    #[error("{role} is not a directory: {path}")]
    NotADirectory { role: &'static str, path: PathBuf },

    /// The urgent marker is empty or whitespace.
    #[error("urgent marker must not be blank (manifest root {root})")]
    BlankMarker { root: PathBuf },

    /// A polling interval of zero seconds.
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    /// Neither a manifest nor a notifier is configured.
    #[error("nothing to run: configure at least one manifest or notifier")]
    NothingConfigured,
}
