//! YAML configuration for manifest and notifier schedulers.
//!
//! # File location
//!
//! ```text
//! --config <path>                        (explicit)
//! $DROPINDEX_CONFIG                      (environment)
//! <config_dir>/dropindex/config.yaml     (platform default)
//! ```
//!
//! # API pattern
//!
//! As with every filesystem-touching helper in this workspace, the loader has
//! two forms:
//! - `load_at(path)`: explicit path; used in tests with `TempDir`
//! - `load()`: resolves the default path, delegates to `load_at`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{HierarchyShape, UrgentMarker};

pub const CONFIG_ENV: &str = "DROPINDEX_CONFIG";
pub const DEFAULT_OUTPUT_NAME: &str = "index.html";

pub const DEFAULT_MANIFEST_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_NOTIFIER_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_TITLE: &str = "Hospital Audio Files";
pub const DEFAULT_CATEGORY_LABEL: &str = "Exam Type";
pub const DEFAULT_GROUP_LABEL: &str = "Doctor";
pub const DEFAULT_ALERT_TITLE: &str = "⚠️ ALERTA DE AUDIO URGENTE ⚠️";
pub const DEFAULT_ALERT_HEADING: &str = "Nuevo audio URGENTE recibido:";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Root of the YAML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Upper bound on a single directory read before the cycle gives up on it.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default)]
    pub manifests: Vec<ManifestSettings>,
    #[serde(default)]
    pub notifiers: Vec<NotifierSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            manifests: Vec::new(),
            notifiers: Vec::new(),
        }
    }
}

/// One manifest scheduler: a drop folder and the document rendered from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSettings {
    pub root: PathBuf,
    #[serde(default)]
    pub urgent_marker: UrgentMarker,
    #[serde(default)]
    pub shape: HierarchyShape,
    #[serde(default = "default_manifest_interval_secs")]
    pub interval_secs: u64,
    /// Defaults to `<root>/index.html`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Client reload directive; defaults to `interval_secs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_secs: Option<u64>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_category_label")]
    pub category_label: String,
    #[serde(default = "default_group_label")]
    pub group_label: String,
    /// Directory of `.tera` files overriding the embedded template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

impl ManifestSettings {
    /// Settings for `root` with every other option at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            urgent_marker: UrgentMarker::default(),
            shape: HierarchyShape::default(),
            interval_secs: DEFAULT_MANIFEST_INTERVAL_SECS,
            output: None,
            refresh_secs: None,
            title: default_title(),
            category_label: default_category_label(),
            group_label: default_group_label(),
            template_dir: None,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_OUTPUT_NAME))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn refresh_secs(&self) -> u64 {
        self.refresh_secs.unwrap_or(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_dir("manifest root", &self.root)?;
        if self.urgent_marker.as_str().trim().is_empty() {
            return Err(ConfigError::BlankMarker {
                root: self.root.clone(),
            });
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "manifest interval_secs",
            });
        }
        if self.refresh_secs == Some(0) {
            return Err(ConfigError::ZeroInterval {
                field: "manifest refresh_secs",
            });
        }
        Ok(())
    }
}

/// One notification scheduler watching a single folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierSettings {
    pub watch_folder: PathBuf,
    #[serde(default = "default_notifier_interval_secs")]
    pub interval_secs: u64,
    /// Treat files present at start-up as already seen.
    #[serde(default)]
    pub prime_existing: bool,
    #[serde(default = "default_alert_title")]
    pub alert_title: String,
    #[serde(default = "default_alert_heading")]
    pub alert_heading: String,
    /// External program that shows the alert and exits once dismissed.
    /// The message is appended as the last argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_command: Option<Vec<String>>,
}

impl NotifierSettings {
    pub fn new(watch_folder: impl Into<PathBuf>) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            interval_secs: DEFAULT_NOTIFIER_INTERVAL_SECS,
            prime_existing: false,
            alert_title: default_alert_title(),
            alert_heading: default_alert_heading(),
            alert_command: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_dir("notifier watch folder", &self.watch_folder)?;
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "notifier interval_secs",
            });
        }
        Ok(())
    }
}

impl Settings {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Check every scheduler entry. Called once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifests.is_empty() && self.notifiers.is_empty() {
            return Err(ConfigError::NothingConfigured);
        }
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "read_timeout_secs",
            });
        }
        for manifest in &self.manifests {
            manifest.validate()?;
        }
        for notifier in &self.notifiers {
            notifier.validate()?;
        }
        Ok(())
    }
}

fn require_dir(role: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::NotADirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<config_dir>/dropindex/config.yaml`, honouring `$DROPINDEX_CONFIG`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("dropindex").join("config.yaml"))
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// Load settings from `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
/// Does not validate; call [`Settings::validate`] once overrides are applied.
pub fn load_at(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, ConfigError> {
    load_at(&default_config_path()?)
}

fn default_read_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

fn default_manifest_interval_secs() -> u64 {
    DEFAULT_MANIFEST_INTERVAL_SECS
}

fn default_notifier_interval_secs() -> u64 {
    DEFAULT_NOTIFIER_INTERVAL_SECS
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_category_label() -> String {
    DEFAULT_CATEGORY_LABEL.to_string()
}

fn default_group_label() -> String {
    DEFAULT_GROUP_LABEL.to_string()
}

fn default_alert_title() -> String {
    DEFAULT_ALERT_TITLE.to_string()
}

fn default_alert_heading() -> String {
    DEFAULT_ALERT_HEADING.to_string()
}
