use super::path::PathSegments;
use crate::lister::DirectoryLister;
use std::collections::{HashMap, HashSet};

/// Rewrites `paths` so that any directory whose whole child set is selected
/// is represented by its own path alone.
///
/// Paths are visited deepest first. For each one not yet folded away, its
/// ancestors are tried nearest first: the ancestor's real child list is
/// fetched from `lister`, and when the number of input paths lying anywhere
/// below it equals that (non-zero) child count, the ancestor replaces all of
/// them. A path with no subsuming ancestor is kept as is. Root-level entries
/// are never folded into the root.
///
/// Listing failures count as zero children, which can only leave a path
/// unfolded. Each ancestor is listed at most once per call, with the same
/// `force_root` the tree used, so counts refer to the directories shown.
pub fn optimize_paths<L>(
    paths: &[PathSegments],
    lister: &L,
    credential: &str,
    force_root: bool,
) -> Vec<PathSegments>
where
    L: DirectoryLister + ?Sized,
{
    let mut sorted: Vec<&PathSegments> = paths.iter().collect();
    sorted.sort_by(|a, b| b.depth().cmp(&a.depth()));

    let mut child_counts: HashMap<String, usize> = HashMap::new();
    let mut processed: HashSet<String> = HashSet::new();
    let mut result: Vec<PathSegments> = Vec::new();

    for path in &sorted {
        if processed.contains(&path.key()) {
            continue;
        }

        let mut folded = false;
        for ancestor in path.ancestors() {
            let covered: Vec<&PathSegments> = sorted
                .iter()
                .copied()
                .filter(|candidate| ancestor.is_proper_prefix_of(candidate))
                .collect();

            let actual = *child_counts
                .entry(ancestor.key())
                .or_insert_with(|| count_children(lister, &ancestor, credential, force_root));

            if actual > 0 && covered.len() == actual {
                tracing::debug!(
                    ancestor = %ancestor,
                    covered = covered.len(),
                    "folding fully selected directory"
                );
                if !result.contains(&ancestor) {
                    result.push(ancestor.clone());
                }
                for candidate in covered {
                    processed.insert(candidate.key());
                }
                folded = true;
                break;
            }
        }

        if !folded && !processed.contains(&path.key()) {
            if !result.contains(path) {
                result.push((*path).clone());
            }
            processed.insert(path.key());
        }
    }

    if result.is_empty() {
        if let Some(first) = paths.first() {
            result.push(first.clone());
        }
    }
    result
}

fn count_children<L>(lister: &L, path: &PathSegments, credential: &str, force_root: bool) -> usize
where
    L: DirectoryLister + ?Sized,
{
    match lister.list_directories(path, credential, force_root) {
        Ok(children) => children.len(),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "listing failed while optimizing; treating as empty");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListError;
    use crate::lister::DirectoryEntry;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// In-memory backend: key → child names. Unknown keys have no children.
    #[derive(Default)]
    struct FakeTree {
        dirs: HashMap<String, Vec<&'static str>>,
        failing: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTree {
        fn with(mut self, key: &str, children: &[&'static str]) -> Self {
            self.dirs.insert(key.to_string(), children.to_vec());
            self
        }

        fn failing(mut self, key: &str) -> Self {
            self.failing.insert(key.to_string());
            self
        }
    }

    impl DirectoryLister for FakeTree {
        fn list_directories(
            &self,
            path: &PathSegments,
            _credential: &str,
            _force_root: bool,
        ) -> Result<Vec<DirectoryEntry>, ListError> {
            self.calls.borrow_mut().push(path.key());
            if self.failing.contains(&path.key()) {
                return Err(ListError::NotFound { path: path.key().into() });
            }
            Ok(self
                .dirs
                .get(&path.key())
                .map(|names| names.iter().map(|n| DirectoryEntry::dir(*n)).collect())
                .unwrap_or_default())
        }
    }

    fn paths(list: &[&str]) -> Vec<PathSegments> {
        list.iter().map(|s| PathSegments::parse(s)).collect()
    }

    fn keys(list: &[PathSegments]) -> Vec<String> {
        let mut keys: Vec<String> = list.iter().map(PathSegments::key).collect();
        keys.sort();
        keys
    }

    #[test]
    fn fully_selected_directory_collapses() {
        let tree = FakeTree::default().with("root", &["a", "b"]);
        let out = optimize_paths(&paths(&["root/a", "root/b"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["root"]);
    }

    #[test]
    fn partially_selected_directory_is_kept() {
        let tree = FakeTree::default().with("root", &["a", "b", "c"]);
        let out = optimize_paths(&paths(&["root/a", "root/b"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["root/a", "root/b"]);
    }

    #[test]
    fn collapse_climbs_to_nearest_subsuming_ancestor() {
        let tree = FakeTree::default()
            .with("top", &["mid", "other"])
            .with("top/mid", &["x", "y"]);
        let out = optimize_paths(&paths(&["top/mid/x", "top/mid/y"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["top/mid"]);
    }

    #[test]
    fn count_includes_deeper_descendants() {
        // Two entries under "top" against two real children: folds, even though
        // "top/b" itself is not selected.
        let tree = FakeTree::default()
            .with("top", &["a", "b"])
            .with("top/a", &["x", "y", "z"]);
        let out = optimize_paths(&paths(&["top/a/x", "top/a"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["top"]);
    }

    #[test]
    fn folded_ancestor_also_in_input_appears_once() {
        let tree = FakeTree::default()
            .with("docs", &["2023", "2024"])
            .with("docs/2024", &["q1", "q2"]);
        let out = optimize_paths(&paths(&["docs/2024", "docs/2024/q1", "docs/2024/q2"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["docs/2024"]);
    }

    #[test]
    fn root_level_entries_are_never_folded_into_root() {
        let tree = FakeTree::default().with("", &["a", "b"]);
        let out = optimize_paths(&paths(&["a", "b"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["a", "b"]);
        assert!(tree.calls.borrow().is_empty());
    }

    #[test]
    fn listing_failure_leaves_paths_unfolded() {
        let tree = FakeTree::default().failing("root");
        let out = optimize_paths(&paths(&["root/a", "root/b"]), &tree, "", true);
        assert_eq!(keys(&out), vec!["root/a", "root/b"]);
    }

    #[test]
    fn each_ancestor_is_listed_once() {
        let tree = FakeTree::default().with("root", &["a", "b", "c"]);
        optimize_paths(&paths(&["root/a", "root/b"]), &tree, "", true);
        assert_eq!(tree.calls.borrow().as_slice(), &["root".to_string()]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let tree = FakeTree::default();
        assert!(optimize_paths(&[], &tree, "", true).is_empty());
    }

    fn path_strategy() -> impl Strategy<Value = PathSegments> {
        proptest::collection::vec("[a-c]", 0..4).prop_map(PathSegments::new)
    }

    proptest! {
        #[test]
        fn never_empty_for_nonempty_input(
            input in proptest::collection::vec(path_strategy(), 1..8),
            fanout in 0usize..4,
        ) {
            // Every directory reports `fanout` children named a, b, c...
            struct Uniform(usize);
            impl DirectoryLister for Uniform {
                fn list_directories(
                    &self,
                    _path: &PathSegments,
                    _credential: &str,
                    _force_root: bool,
                ) -> Result<Vec<DirectoryEntry>, ListError> {
                    Ok(["a", "b", "c"].iter().take(self.0).map(|n| DirectoryEntry::dir(*n)).collect())
                }
            }
            let out = optimize_paths(&input, &Uniform(fanout), "", true);
            prop_assert!(!out.is_empty());
        }

        #[test]
        fn minimal_sets_come_back_unchanged(
            names in proptest::collection::btree_set("[a-e]", 1..4),
        ) {
            // "base" has five children; selecting fewer than five never folds.
            let tree = FakeTree::default().with("base", &["a", "b", "c", "d", "e"]);
            let input: Vec<PathSegments> =
                names.iter().map(|n| PathSegments::new(["base", n.as_str()])).collect();
            let out = optimize_paths(&input, &tree, "", true);
            prop_assert_eq!(keys(&out), keys(&input));
        }
    }
}
