//! `dropindex render`: one manifest cycle, then exit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dropindex_publish::{FileSink, ManifestPipeline};

use super::TreeArgs;

/// Arguments for `dropindex render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Output document; defaults to `<root>/index.html`.
    #[arg(long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the document instead of writing it.
    #[arg(long)]
    pub stdout: bool,

    /// Document title.
    #[arg(long)]
    pub title: Option<String>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let mut settings = self.tree.settings();
        settings.output = self.output;
        if let Some(title) = self.title {
            settings.title = title;
        }
        settings.validate().context("invalid render options")?;

        let pipeline = ManifestPipeline::new(settings.clone()).context("failed to load templates")?;

        if self.stdout {
            let snapshot = pipeline.snapshot();
            let document = pipeline.render(&snapshot).context("render failed")?;
            print!("{document}");
            return Ok(());
        }

        let sink = FileSink::new(settings.output_path());
        let report = pipeline
            .run_cycle(&sink)
            .with_context(|| format!("failed to publish {}", settings.output_path().display()))?;

        for issue in &report.issues {
            eprintln!("{} {}: {}", "warning:".yellow(), issue.path.display(), issue.message);
        }
        println!(
            "✓ wrote {} ({} categories, {} files)",
            report.write.path.display(),
            report.categories,
            report.files
        );
        Ok(())
    }
}
