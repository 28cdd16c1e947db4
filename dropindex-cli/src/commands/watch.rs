//! `dropindex watch`: a single notifier from flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dropindex_core::config::{DEFAULT_NOTIFIER_INTERVAL_SECS, DEFAULT_READ_TIMEOUT_SECS};
use dropindex_core::{NotifierSettings, Settings};

/// Arguments for `dropindex watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Folder to poll.
    #[arg(long)]
    pub folder: PathBuf,

    /// Seconds between polls.
    #[arg(long, default_value_t = DEFAULT_NOTIFIER_INTERVAL_SECS)]
    pub interval: u64,

    /// Treat entries present at startup as already seen.
    #[arg(long)]
    pub prime: bool,

    /// Alert banner title.
    #[arg(long)]
    pub title: Option<String>,

    /// First line of the alert message.
    #[arg(long)]
    pub heading: Option<String>,

    /// Seconds before a directory read is abandoned.
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout: u64,

    /// Dialog program run for each alert, e.g. `-- zenity --warning --text`.
    /// The message is appended as the final argument.
    #[arg(last = true)]
    pub command: Vec<String>,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let mut notifier = NotifierSettings::new(&self.folder);
        notifier.interval_secs = self.interval;
        notifier.prime_existing = self.prime;
        if let Some(title) = self.title {
            notifier.alert_title = title;
        }
        if let Some(heading) = self.heading {
            notifier.alert_heading = heading;
        }
        if !self.command.is_empty() {
            notifier.alert_command = Some(self.command);
        }

        let settings = Settings {
            read_timeout_secs: self.read_timeout,
            notifiers: vec![notifier],
            ..Settings::default()
        };
        settings.validate().context("invalid watch options")?;
        dropindex_daemon::start_blocking(settings).context("notifier stopped with an error")
    }
}
