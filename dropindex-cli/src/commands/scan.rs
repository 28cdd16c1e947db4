//! `dropindex scan`: show the snapshot a manifest cycle would render.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use dropindex_core::Manifest;
use dropindex_scanner::{scan, FsReader, Snapshot};

use super::TreeArgs;

/// Arguments for `dropindex scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "section")]
    section: String,
    #[tabled(rename = "group")]
    group: String,
    #[tabled(rename = "file")]
    file: String,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let settings = self.tree.settings();
        settings.validate().context("invalid scan options")?;

        let snapshot = scan(&FsReader, &settings.root, settings.shape, &settings.urgent_marker);

        if self.json {
            let out = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
            println!("{out}");
            return Ok(());
        }

        print_table(&snapshot);
        Ok(())
    }
}

fn rows(manifest: &Manifest) -> Vec<FileRow> {
    let mut rows = Vec::new();
    for category in manifest.categories() {
        let section = if category.is_urgent {
            format!("{} (urgent)", category.name)
        } else {
            category.name.clone()
        };
        for group in &category.groups {
            rows.extend(group.files.iter().map(|f| FileRow {
                section: section.clone(),
                group: group.name.clone(),
                file: f.name.clone(),
            }));
        }
        rows.extend(category.files.iter().map(|f| FileRow {
            section: section.clone(),
            group: "-".to_string(),
            file: f.name.clone(),
        }));
    }
    rows
}

fn print_table(snapshot: &Snapshot) {
    let rows = rows(&snapshot.manifest);
    if rows.is_empty() {
        println!("No files under any category.");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    println!(
        "{} categories, {} files ({} shape)",
        snapshot.manifest.categories().len(),
        snapshot.manifest.file_count(),
        snapshot.manifest.shape
    );
    for issue in &snapshot.issues {
        eprintln!("{} {}: {}", "warning:".yellow(), issue.path.display(), issue.message);
    }
}
