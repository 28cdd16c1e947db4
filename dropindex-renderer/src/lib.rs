//! # dropindex-renderer
//!
//! Tera-based renderer that turns a [`Manifest`](dropindex_core::Manifest) into
//! the auto-refreshing HTML index of a drop folder.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dropindex_core::{Manifest, ManifestSettings};
//! use dropindex_renderer::{DocumentSettings, ManifestRenderer};
//!
//! fn render(manifest: &Manifest, settings: &ManifestSettings) -> Option<String> {
//!     let renderer = ManifestRenderer::new().ok()?;
//!     renderer.render(manifest, &DocumentSettings::from(settings)).ok()
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{DocumentSettings, ManifestContext};
pub use engine::{ManifestRenderer, TemplateEngine, MANIFEST_TEMPLATE};
pub use error::RenderError;
