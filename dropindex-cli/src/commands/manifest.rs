//! `dropindex manifest`: a single manifest scheduler from flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dropindex_core::config::{DEFAULT_MANIFEST_INTERVAL_SECS, DEFAULT_READ_TIMEOUT_SECS};
use dropindex_core::Settings;

use super::TreeArgs;

/// Arguments for `dropindex manifest`.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Seconds between cycles.
    #[arg(long, default_value_t = DEFAULT_MANIFEST_INTERVAL_SECS)]
    pub interval: u64,

    /// Browser reload interval; defaults to `--interval`.
    #[arg(long)]
    pub refresh: Option<u64>,

    /// Output document; defaults to `<root>/index.html`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Document title.
    #[arg(long)]
    pub title: Option<String>,

    /// Seconds before a directory read is abandoned.
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout: u64,
}

impl ManifestArgs {
    pub fn run(self) -> Result<()> {
        let mut manifest = self.tree.settings();
        manifest.interval_secs = self.interval;
        manifest.refresh_secs = self.refresh;
        manifest.output = self.output;
        if let Some(title) = self.title {
            manifest.title = title;
        }

        let settings = Settings {
            read_timeout_secs: self.read_timeout,
            manifests: vec![manifest],
            ..Settings::default()
        };
        settings.validate().context("invalid manifest options")?;
        dropindex_daemon::start_blocking(settings).context("manifest scheduler stopped with an error")
    }
}
