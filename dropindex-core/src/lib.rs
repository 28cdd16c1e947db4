//! dropindex core library: manifest model, configuration, errors.
//!
//! - [`types`]: the manifest tree and its newtypes
//! - [`config`]: YAML settings for manifest and notifier schedulers
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ManifestSettings, NotifierSettings, Settings};
pub use error::ConfigError;
pub use types::{
    same_name, Category, FileEntry, Group, HierarchyShape, Manifest, UrgentMarker,
};
