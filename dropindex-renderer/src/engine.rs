//! Tera rendering engine: [`TemplateEngine`] and [`ManifestRenderer`].
//!
//! The embedded template is `manifest/index.html.tera`. A user template
//! directory may override it by providing a file at the same relative path.
//! Templates ending in `.html.tera` are autoescaped, so folder and file names
//! can never inject markup into the document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use dropindex_core::Manifest;

use crate::context::{DocumentSettings, ManifestContext};
use crate::error::RenderError;

pub const MANIFEST_TEMPLATE: &str = "manifest/index.html.tera";

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(
    MANIFEST_TEMPLATE,
    include_str!("templates/manifest/index.html.tera"),
)];

// ---------------------------------------------------------------------------
// Template sources
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// Lookup key for a template: forward slashes, lowercase.
fn template_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}

/// Every `*.tera` file below `base`, keyed relative to `base`. A missing
/// directory contributes nothing.
fn read_override_dir(base: &Path) -> Result<HashMap<String, String>, RenderError> {
    let mut found = HashMap::new();
    if !base.is_dir() {
        tracing::debug!(dir = %base.display(), "template override directory absent");
        return Ok(found);
    }

    let mut pending = vec![base.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let path = entry.map_err(|e| io_err(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("tera") {
                continue;
            }
            let Ok(rel) = path.strip_prefix(base) else { continue };
            let body = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            found.insert(template_key(rel), body);
        }
    }
    Ok(found)
}

/// Embedded templates, then overrides from `override_dir` on top.
fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut sources: HashMap<String, String> = TPLS
        .iter()
        .map(|(name, body)| (template_key(Path::new(name)), (*body).to_string()))
        .collect();
    if let Some(dir) = override_dir {
        sources.extend(read_override_dir(dir)?);
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html.tera", ".html"]);
    tera.add_raw_templates(sources)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded defaults.
/// Template names are normalised to lowercase and relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the manifest template with the supplied context.
    pub fn render(&self, ctx: &ManifestContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(MANIFEST_TEMPLATE, &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// ManifestRenderer
// ---------------------------------------------------------------------------

/// Renders a [`Manifest`] into the self-refreshing HTML document.
///
/// Create once per scheduler and reuse across cycles.
pub struct ManifestRenderer {
    engine: TemplateEngine,
}

impl ManifestRenderer {
    /// Construct a new [`ManifestRenderer`] with the embedded template.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template_dir(None)
    }

    /// Construct a renderer whose templates may be overridden from `dir`.
    pub fn with_template_dir(dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(ManifestRenderer { engine: TemplateEngine::new(dir)? })
    }

    /// Render `manifest`. Pure: equal inputs give byte-identical output.
    pub fn render(&self, manifest: &Manifest, doc: &DocumentSettings) -> Result<String, RenderError> {
        let ctx = ManifestContext::from_manifest(manifest, doc);
        self.render_with_context(&ctx)
    }

    /// Render using a caller-provided [`ManifestContext`].
    pub fn render_with_context(&self, ctx: &ManifestContext) -> Result<String, RenderError> {
        self.engine.render(ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dropindex_core::{Category, FileEntry, HierarchyShape, ManifestSettings};

    fn doc() -> DocumentSettings {
        DocumentSettings::from(&ManifestSettings::new("/srv/HOSPITAL"))
    }

    #[test]
    fn renderer_new_succeeds() {
        ManifestRenderer::new().expect("ManifestRenderer::new should succeed with embedded templates");
    }

    #[test]
    fn empty_manifest_renders_a_valid_shell() {
        let renderer = ManifestRenderer::new().unwrap();
        let html = renderer.render(&Manifest::new(HierarchyShape::Nested), &doc()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta http-equiv='refresh' content='60'>"));
        assert!(html.contains("<title>Hospital Audio Files</title>"));
        assert!(!html.contains("exam-section"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn names_are_html_escaped() {
        let renderer = ManifestRenderer::new().unwrap();
        let mut m = Manifest::new(HierarchyShape::Flat);
        m.push_category(Category::flat("<b>G</b>", vec![FileEntry::from("a&b<script>.wav")]));
        let html = renderer.render(&m, &doc()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("a&amp;b&lt;script&gt;.wav"));
        assert!(html.contains("&lt;b&gt;G&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let renderer = ManifestRenderer::new().unwrap();
        let mut m = Manifest::new(HierarchyShape::Flat);
        m.push_category(Category::urgent("URGENTE", vec![FileEntry::from("u.wav")]));
        let html = renderer.render(&m, &doc()).unwrap();
        assert!(!html.contains('\r'), "rendered document contains CR char");
    }
}
