//! Template context: serializable rendering payload built from a [`Manifest`].
//!
//! The context carries nothing but the manifest and the document settings, so
//! equal inputs always render to identical bytes.

use serde::{Deserialize, Serialize};

use dropindex_core::{Category, HierarchyShape, Manifest, ManifestSettings};

use crate::error::RenderError;

/// Document-level options that are not part of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub title: String,
    /// Client reload directive, in seconds.
    pub refresh_secs: u64,
    pub category_label: String,
    pub group_label: String,
}

impl From<&ManifestSettings> for DocumentSettings {
    fn from(s: &ManifestSettings) -> Self {
        Self {
            title: s.title.clone(),
            refresh_secs: s.refresh_secs(),
            category_label: s.category_label.clone(),
            group_label: s.group_label.clone(),
        }
    }
}

/// Full rendering payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestContext {
    pub title: String,
    pub refresh_secs: u64,
    pub group_label: String,
    pub shape: String,
    /// Urgent section first, then the remaining categories in model order.
    pub sections: Vec<SectionCtx>,
}

/// One `<div>` of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionCtx {
    pub name: String,
    pub heading: String,
    pub urgent: bool,
    /// `true` when the section lists groups rather than files.
    pub grouped: bool,
    pub groups: Vec<GroupCtx>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCtx {
    pub name: String,
    pub files: Vec<String>,
}

impl ManifestContext {
    /// Build a [`ManifestContext`] from a [`Manifest`].
    pub fn from_manifest(manifest: &Manifest, doc: &DocumentSettings) -> Self {
        let sections = manifest
            .categories()
            .iter()
            .map(|c| SectionCtx::from_category(c, manifest.shape, doc))
            .collect();

        ManifestContext {
            title: doc.title.clone(),
            refresh_secs: doc.refresh_secs,
            group_label: doc.group_label.clone(),
            shape: manifest.shape.to_string(),
            sections,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

impl SectionCtx {
    fn from_category(category: &Category, shape: HierarchyShape, doc: &DocumentSettings) -> Self {
        let grouped = !category.is_urgent && shape == HierarchyShape::Nested;
        let heading = if category.is_urgent {
            category.name.clone()
        } else if grouped {
            format!("{}: {}", doc.category_label, category.name)
        } else {
            format!("{}: {}", doc.group_label, category.name)
        };

        SectionCtx {
            name: category.name.clone(),
            heading,
            urgent: category.is_urgent,
            grouped,
            groups: category
                .groups
                .iter()
                .map(|g| GroupCtx {
                    name: g.name.clone(),
                    files: g.files.iter().map(|f| f.name.clone()).collect(),
                })
                .collect(),
            files: category.files.iter().map(|f| f.name.clone()).collect(),
        }
    }
}
