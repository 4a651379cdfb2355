use super::path::PathSegments;
use std::collections::HashSet;
use std::fmt;

/// User-chosen directories, unique by joined key, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    paths: Vec<PathSegments>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSegments> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathSegments] {
        &self.paths
    }

    pub fn contains(&self, path: &PathSegments) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Some entry lies strictly below `path`.
    pub fn has_descendant_of(&self, path: &PathSegments) -> bool {
        self.paths.iter().any(|p| path.is_proper_prefix_of(p))
    }

    /// Appends `path` unless an equal entry exists. Returns whether it was added.
    pub fn insert(&mut self, path: PathSegments) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Drops `path` and everything below it.
    pub fn remove_subtree(&mut self, path: &PathSegments) {
        self.paths.retain(|p| !path.covers(p));
    }

    /// Applies one check/uncheck action taken at `path`.
    ///
    /// Checking adds the node itself (unless it is the root) and each of
    /// `child_paths`. Unchecking the root clears the selection; unchecking any
    /// other node removes that node and its whole subtree.
    pub fn toggle(&mut self, path: &PathSegments, next_checked: bool, child_paths: &[PathSegments]) {
        if next_checked {
            if !path.is_root() {
                self.insert(path.clone());
            }
            for child in child_paths {
                self.insert(child.clone());
            }
        } else if path.is_root() {
            self.clear();
        } else {
            self.remove_subtree(path);
        }
        self.dedup();
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.paths.retain(|p| seen.insert(p.key()));
    }

    /// Leading-slash strings in selection order, as reported to change observers.
    pub fn to_slash_paths(&self) -> Vec<String> {
        self.paths.iter().map(PathSegments::to_slash_path).collect()
    }

    /// First `limit` entries in full, the rest only counted.
    pub fn summary(&self, limit: usize) -> SelectionSummary {
        let shown = self.paths.iter().take(limit).map(PathSegments::to_slash_path).collect();
        let overflow = self
            .paths
            .iter()
            .skip(limit)
            .map(PathSegments::to_slash_path)
            .collect();
        SelectionSummary { shown, overflow }
    }
}

impl FromIterator<PathSegments> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = PathSegments>>(iter: T) -> Self {
        let mut set = SelectionSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a PathSegments;
    type IntoIter = std::slice::Iter<'a, PathSegments>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Truncated view of a selection for one-line display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub shown: Vec<String>,
    pub overflow: Vec<String>,
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shown.is_empty() {
            return f.write_str("(no folders selected)");
        }
        f.write_str(&self.shown.join(", "))?;
        if !self.overflow.is_empty() {
            write!(f, " +{}", self.overflow.len())?;
        }
        Ok(())
    }
}
