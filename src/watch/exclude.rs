// src/watch/exclude.rs

//! Substring-based path exclusion (`--ex`).

use std::path::Path;

/// Patterns collected from repeated `--ex` flags, in flag order.
///
/// A path is excluded when any pattern occurs anywhere in it. Matching is
/// plain substring search on the path as given: separators are not
/// normalised and case is significant, so `--ex target` also hides
/// `./src/targets.rs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    patterns: Vec<String>,
}

impl ExclusionList {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }

    /// [`is_excluded`](Self::is_excluded) on the lossy UTF-8 form of `path`.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        self.is_excluded(&path.to_string_lossy())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FromIterator<String> for ExclusionList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
