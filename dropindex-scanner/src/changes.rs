//! Change detection for a single watched folder.
//!
//! [`ChangeDetector`] owns a [`DetectorState`]: the cumulative set of every name
//! ever observed. Each cycle reports names that were not in the set at the start
//! of the cycle and then adds them to it. The set never shrinks, so a file that
//! is deleted and re-delivered under the same name is not reported again.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::error::ScanError;
use crate::reader::DirectoryReader;

/// Names observed so far by one detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorState {
    seen: HashSet<String>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `listing` as seen without reporting it.
    pub fn prime<I>(&mut self, listing: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.seen.extend(listing);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Names new in one cycle, in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeDelta(BTreeSet<String>);

impl ChangeDelta {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeDelta {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Computes per-cycle deltas against a [`DetectorState`].
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    state: DetectorState,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: DetectorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// `listing − seen`, then `seen ∪= delta`.
    ///
    /// The state update is unconditional: it happens before, and regardless
    /// of, whatever the caller does with the delta.
    pub fn detect<I>(&mut self, listing: I) -> ChangeDelta
    where
        I: IntoIterator<Item = String>,
    {
        let delta: BTreeSet<String> = listing
            .into_iter()
            .filter(|name| !self.state.contains(name))
            .collect();
        self.state.seen.extend(delta.iter().cloned());
        ChangeDelta(delta)
    }

    /// Like [`detect`](Self::detect), but for a listing that may have failed.
    /// A failed read yields an empty delta and leaves the state untouched.
    pub fn observe(&mut self, listing: Result<Vec<String>, ScanError>) -> ChangeDelta {
        match listing {
            Ok(names) => self.detect(names),
            Err(err) => {
                tracing::warn!(path = %err.path().display(), error = %err, "watch folder unreadable, skipping cycle");
                ChangeDelta::default()
            }
        }
    }
}

/// Every entry name in `folder`, files and directories alike.
pub fn read_listing<R: DirectoryReader>(reader: &R, folder: &Path) -> Result<Vec<String>, ScanError> {
    Ok(reader
        .read_dir(folder)?
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_listing_twice_reports_once() {
        let mut detector = ChangeDetector::new();
        let first = detector.detect(names(&["a.wav", "b.wav"]));
        let second = detector.detect(names(&["a.wav", "b.wav"]));
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[test]
    fn delta_is_sorted() {
        let mut detector = ChangeDetector::new();
        let delta = detector.detect(names(&["z.wav", "a.wav", "m.wav"]));
        assert_eq!(delta.into_vec(), names(&["a.wav", "m.wav", "z.wav"]));
    }

    #[test]
    fn failed_read_leaves_state_untouched() {
        let mut detector = ChangeDetector::new();
        detector.detect(names(&["a.wav"]));
        let err = ScanError::DirectoryRead {
            path: PathBuf::from("/srv/notif"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let delta = detector.observe(Err(err));
        assert!(delta.is_empty());
        assert_eq!(detector.state().len(), 1);

        let delta = detector.observe(Ok(names(&["a.wav", "b.wav"])));
        assert_eq!(delta.into_vec(), names(&["b.wav"]));
    }

    #[test]
    fn primed_names_are_not_reported() {
        let mut state = DetectorState::new();
        state.prime(names(&["old.wav"]));
        let mut detector = ChangeDetector::with_state(state);
        let delta = detector.detect(names(&["old.wav", "new.wav"]));
        assert_eq!(delta.into_vec(), names(&["new.wav"]));
    }

    #[test]
    fn independent_detectors_do_not_share_state() {
        let mut a = ChangeDetector::new();
        let mut b = ChangeDetector::new();
        a.detect(names(&["x.wav"]));
        assert!(b.detect(names(&["x.wav"])).contains("x.wav"));
    }
}
