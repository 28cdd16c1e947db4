pub mod manifest;
pub mod render;
pub mod run;
pub mod scan;
pub mod watch;

use std::path::PathBuf;

use clap::Args;

use dropindex_core::{HierarchyShape, ManifestSettings, UrgentMarker};

/// Where to look and how to read the tree. Shared by manifest, render and scan.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Drop folder root.
    #[arg(long)]
    pub root: PathBuf,

    /// `nested` (category/group/file) or `flat` (group/file).
    #[arg(long, default_value = "nested")]
    pub shape: HierarchyShape,

    /// Folder name that is listed first and flat (case-insensitive).
    #[arg(long, default_value = UrgentMarker::DEFAULT)]
    pub marker: String,

    /// Directory of user templates overriding the embedded ones.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,
}

impl TreeArgs {
    pub fn settings(&self) -> ManifestSettings {
        let mut settings = ManifestSettings::new(&self.root);
        settings.shape = self.shape;
        settings.urgent_marker = UrgentMarker(self.marker.clone());
        settings.template_dir = self.template_dir.clone();
        settings
    }
}
