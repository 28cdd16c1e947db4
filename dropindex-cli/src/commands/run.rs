//! `dropindex run`: every configured scheduler in one process.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dropindex_core::config;

/// Arguments for `dropindex run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file. Falls back to `<config dir>/dropindex/config.yaml`.
    #[arg(long, env = "DROPINDEX_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let settings = match self.config.as_deref() {
            Some(path) => config::load_at(path),
            None => config::load(),
        }
        .context("failed to load configuration")?;
        settings.validate().context("invalid configuration")?;

        tracing::info!(
            manifests = settings.manifests.len(),
            notifiers = settings.notifiers.len(),
            "starting dropindex",
        );
        dropindex_daemon::start_blocking(settings).context("dropindex stopped with an error")
    }
}
