//! dropindex: drop-folder manifests and new-file alerts.
//!
//! # Usage
//!
//! ```text
//! dropindex run [--config <path>]
//! dropindex manifest --root <dir> [--shape flat|nested] [--marker URGENTE] [--interval 60]
//! dropindex watch --folder <dir> [--interval 15] [--prime] [-- <alert command>...]
//! dropindex render --root <dir> [--stdout]
//! dropindex scan --root <dir> [--json]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    manifest::ManifestArgs, render::RenderArgs, run::RunArgs, scan::ScanArgs, watch::WatchArgs,
};
use dropindex_daemon::LogFormat;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dropindex",
    version,
    about = "Publish drop-folder manifests and alert on newly delivered files",
    long_about = None,
)]
struct Cli {
    /// Log output format (text or json). Logs go to stderr.
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configured manifest and notifier until ctrl-c.
    Run(RunArgs),

    /// Republish one folder's manifest on an interval.
    Manifest(ManifestArgs),

    /// Alert on new entries in one folder.
    Watch(WatchArgs),

    /// Scan, render and write a manifest once.
    Render(RenderArgs),

    /// Print what a manifest cycle would see.
    Scan(ScanArgs),
}

// ---------------------------------------------------------------------------
// --log-format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct LogFormatArg(pub LogFormat);

impl FromStr for LogFormatArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self(LogFormat::Text)),
            "json" => Ok(Self(LogFormat::Json)),
            other => Err(format!("unknown log format '{other}'; expected: text, json")),
        }
    }
}

impl fmt::Display for LogFormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    dropindex_daemon::init_tracing(cli.log_format.0);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Manifest(args) => args.run(),
        Commands::Watch(args) => args.run(),
        Commands::Render(args) => args.run(),
        Commands::Scan(args) => args.run(),
    }
}
