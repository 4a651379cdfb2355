use std::fmt;
use std::hash::{Hash, Hasher};

const SEPARATOR: char = '/';

/// A directory address as an ordered list of name components.
///
/// The empty list is the root. Identity is the slash-joined form, so two
/// values compare equal whenever their joined keys match.
#[derive(Debug, Clone, Default)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    pub fn root() -> Self {
        PathSegments(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PathSegments(segments.into_iter().map(Into::into).collect())
    }

    /// Parses `"/docs/2024/"`, `"docs/2024"` or `"/"`. Empty components are dropped.
    pub fn parse(path: &str) -> Self {
        PathSegments(
            path.split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Slash-joined key without a leading slash; the root's key is `""`.
    pub fn key(&self) -> String {
        self.0.join("/")
    }

    /// Leading-slash form handed to callers: `"/docs/2024"`, root is `"/"`.
    pub fn to_slash_path(&self) -> String {
        format!("/{}", self.key())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        PathSegments(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            Some(PathSegments(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Ancestors nearest first, stopping before the root.
    pub fn ancestors(&self) -> Vec<PathSegments> {
        (1..self.0.len())
            .rev()
            .map(|len| PathSegments(self.0[..len].to_vec()))
            .collect()
    }

    /// True when `other` lies strictly below `self`.
    pub fn is_proper_prefix_of(&self, other: &PathSegments) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        let own = self.key();
        let theirs = other.key();
        theirs.len() > own.len() + 1
            && theirs.starts_with(own.as_str())
            && theirs[own.len()..].starts_with(SEPARATOR)
    }

    /// `self == other` or `self` is an ancestor of `other`.
    pub fn covers(&self, other: &PathSegments) -> bool {
        self == other || self.is_proper_prefix_of(other)
    }

    /// A hidden folder has at least one dot-prefixed component.
    pub fn is_hidden(&self) -> bool {
        self.0.iter().any(|s| s.starts_with('.'))
    }
}

impl PartialEq for PathSegments {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PathSegments {}

impl Hash for PathSegments {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for PathSegments {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathSegments {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash_path())
    }
}

impl From<&str> for PathSegments {
    fn from(path: &str) -> Self {
        PathSegments::parse(path)
    }
}
