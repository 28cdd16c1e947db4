//! Manifest model: the ordered tree snapshot rendered every manifest cycle.
//!
//! A [`Manifest`] is rebuilt from scratch on every poll and never mutated
//! incrementally afterwards. Its one structural invariant (urgent category first,
//! one category per case-insensitive name) is enforced by [`Manifest::push_category`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The reserved folder name that marks the urgent category.
///
/// Matching is case-insensitive: `URGENTE`, `Urgente` and `urgente` are the same
/// folder as far as the manifest is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrgentMarker(pub String);

impl UrgentMarker {
    /// Marker used by the HOSPITAL deployment.
    pub const DEFAULT: &'static str = "URGENTE";

    /// `true` when `name` is the urgent folder.
    pub fn matches(&self, name: &str) -> bool {
        same_name(&self.0, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrgentMarker {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for UrgentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for UrgentMarker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UrgentMarker {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Case-insensitive name identity used for categories and the urgent marker.
pub fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Layout of the drop folder below its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyShape {
    /// `root/<group>/<file>`: every non-urgent folder is a group.
    Flat,
    /// `root/<category>/<group>/<file>`.
    #[default]
    Nested,
}

impl fmt::Display for HierarchyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyShape::Flat => write!(f, "flat"),
            HierarchyShape::Nested => write!(f, "nested"),
        }
    }
}

impl FromStr for HierarchyShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(HierarchyShape::Flat),
            "nested" => Ok(HierarchyShape::Nested),
            other => Err(format!(
                "unknown hierarchy shape '{other}'; expected: flat, nested"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A leaf file. Only the name is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
}

impl From<&str> for FileEntry {
    fn from(s: &str) -> Self {
        Self { name: s.to_owned() }
    }
}

impl From<String> for FileEntry {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// A responsible party (e.g. a doctor) under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Group {
    pub fn new(name: impl Into<String>, files: Vec<FileEntry>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }
}

/// One folder directly under the manifest root.
///
/// `groups` is used by non-urgent categories of the nested shape; `files` holds
/// direct children for the urgent category and for every flat-shape category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub is_urgent: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Category {
    /// A category holding groups (nested shape).
    pub fn grouped(name: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            name: name.into(),
            is_urgent: false,
            groups,
            files: Vec::new(),
        }
    }

    /// A category holding its files directly (flat shape).
    pub fn flat(name: impl Into<String>, files: Vec<FileEntry>) -> Self {
        Self {
            name: name.into(),
            is_urgent: false,
            groups: Vec::new(),
            files,
        }
    }

    /// The urgent category; always flat.
    pub fn urgent(name: impl Into<String>, files: Vec<FileEntry>) -> Self {
        Self {
            is_urgent: true,
            ..Self::flat(name, files)
        }
    }

    /// Total number of files below this category.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.groups.iter().map(|g| g.files.len()).sum::<usize>()
    }

    fn absorb(&mut self, other: Category) {
        self.groups.extend(other.groups);
        self.files.extend(other.files);
    }
}

/// Root aggregate: the ordered categories of one drop folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Manifest {
    pub shape: HierarchyShape,
    categories: Vec<Category>,
}

impl Manifest {
    pub fn new(shape: HierarchyShape) -> Self {
        Self {
            shape,
            categories: Vec::new(),
        }
    }

    /// Add a category, keeping the urgent category first.
    ///
    /// A category whose name matches an existing one case-insensitively is
    /// merged into it rather than listed twice.
    pub fn push_category(&mut self, category: Category) {
        if let Some(existing) = self
            .categories
            .iter_mut()
            .find(|c| c.is_urgent == category.is_urgent && same_name(&c.name, &category.name))
        {
            existing.absorb(category);
            return;
        }
        if category.is_urgent {
            match self.categories.iter_mut().find(|c| c.is_urgent) {
                Some(existing) => existing.absorb(category),
                None => self.categories.insert(0, category),
            }
        } else {
            self.categories.push(category);
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn urgent(&self) -> Option<&Category> {
        self.categories.first().filter(|c| c.is_urgent)
    }

    /// Find a category by case-insensitive name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| same_name(&c.name, name))
    }

    pub fn file_count(&self) -> usize {
        self.categories.iter().map(Category::file_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_matches_case_insensitively() {
        let marker = UrgentMarker::default();
        assert!(marker.matches("URGENTE"));
        assert!(marker.matches("urgente"));
        assert!(marker.matches("Urgente"));
        assert!(!marker.matches("URGENT"));
        assert!(!marker.matches("URGENTES"));
    }

    #[test]
    fn urgent_category_is_moved_to_front() {
        let mut m = Manifest::new(HierarchyShape::Nested);
        m.push_category(Category::grouped("CARDIO", vec![]));
        m.push_category(Category::grouped("NEURO", vec![]));
        m.push_category(Category::urgent("URGENTE", vec!["u1.wav".into()]));

        let names: Vec<_> = m.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["URGENTE", "CARDIO", "NEURO"]);
        assert_eq!(m.urgent().map(|c| c.files.len()), Some(1));
    }

    #[test]
    fn colliding_names_are_merged() {
        let mut m = Manifest::new(HierarchyShape::Nested);
        m.push_category(Category::grouped(
            "Cardio",
            vec![Group::new("DrSmith", vec!["a.wav".into()])],
        ));
        m.push_category(Category::grouped(
            "CARDIO",
            vec![Group::new("DrJones", vec!["b.wav".into()])],
        ));
        assert_eq!(m.categories().len(), 1);
        assert_eq!(m.categories()[0].name, "Cardio");
        assert_eq!(m.categories()[0].groups.len(), 2);
        assert_eq!(m.file_count(), 2);
    }

    #[test]
    fn two_urgent_spellings_collapse_into_one_section() {
        let mut m = Manifest::new(HierarchyShape::Flat);
        m.push_category(Category::urgent("URGENTE", vec!["a.wav".into()]));
        m.push_category(Category::flat("G1", vec![]));
        m.push_category(Category::urgent("urgente", vec!["b.wav".into()]));
        assert_eq!(m.categories().len(), 2);
        assert!(m.categories()[0].is_urgent);
        assert_eq!(m.categories()[0].files.len(), 2);
    }

    #[test]
    fn shape_parse_and_display() {
        assert_eq!("FLAT".parse::<HierarchyShape>().unwrap(), HierarchyShape::Flat);
        assert_eq!(HierarchyShape::Nested.to_string(), "nested");
        assert!("tree".parse::<HierarchyShape>().is_err());
    }
}
