use crate::selection::PathSegments;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Build pretty tree-style labels in **O(n)**.
///
/// * `paths` **must** be sorted by segments and contain every ancestor of
///   each entry, starting with the root.
pub fn build_tree_labels(paths: &[PathSegments]) -> Vec<String> {
    let n = paths.len();
    let mut labels = Vec::with_capacity(n);
    // is_last_vec[i] is true if paths[i] is the last child of its parent.
    let mut is_last_vec = vec![false; n];
    let mut last_child_map = HashMap::<String, usize>::new();

    // PASS #1 – record each directory's last immediate child index
    for (idx, path) in paths.iter().enumerate() {
        if let Some(parent) = path.parent() {
            last_child_map.insert(parent.key(), idx);
        }
    }

    // PASS #2 – scan once, using a stack of ancestor indices
    let mut ancestor_stack: Vec<usize> = Vec::new();
    for (idx, path) in paths.iter().enumerate() {
        let depth = path.depth();
        ancestor_stack.truncate(depth);

        let is_last_child = path
            .parent()
            .is_some_and(|parent| last_child_map.get(&parent.key()) == Some(&idx));
        is_last_vec[idx] = is_last_child;

        let label = if depth == 0 {
            "/".to_string()
        } else {
            let mut prefix = String::new();
            // Skip the root (stack[0]); it draws no guide.
            for &ancestor_idx in ancestor_stack.iter().skip(1) {
                prefix.push_str(if is_last_vec[ancestor_idx] { "   " } else { "│  " });
            }
            prefix.push_str(if is_last_child { "└─ " } else { "├─ " });
            format!("{}{}/", prefix, path.name().unwrap_or_default())
        };
        labels.push(label);

        while ancestor_stack.len() < depth {
            // Jump in depth means a missing ancestor; keep indices aligned.
            ancestor_stack.push(idx);
        }
        ancestor_stack.push(idx);
    }
    labels
}

/// Renders `selected` as a tree, adding the ancestors needed to connect them.
/// Selected folders are marked with `[x]`.
pub fn render_selection_tree(selected: &[PathSegments]) -> String {
    let mut all: BTreeSet<Vec<String>> = BTreeSet::new();
    all.insert(Vec::new());
    for path in selected {
        all.insert(path.segments().to_vec());
        for ancestor in path.ancestors() {
            all.insert(ancestor.segments().to_vec());
        }
    }
    let ordered: Vec<PathSegments> = all.into_iter().map(PathSegments::new).collect();
    let marked: HashSet<String> = selected.iter().map(PathSegments::key).collect();

    let mut out = String::new();
    for (path, label) in ordered.iter().zip(build_tree_labels(&ordered)) {
        out.push_str(&label);
        if marked.contains(&path.key()) {
            out.push_str(" [x]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathSegments {
        PathSegments::parse(s)
    }

    #[test]
    fn labels_draw_guides_for_open_ancestors() {
        let paths = vec![p("/"), p("a"), p("a/x"), p("a/y"), p("b")];
        assert_eq!(
            build_tree_labels(&paths),
            vec!["/", "├─ a/", "│  ├─ x/", "│  └─ y/", "└─ b/"]
        );
    }

    #[test]
    fn last_branch_uses_blank_guide() {
        let paths = vec![p("/"), p("a"), p("a/x"), p("a/x/deep")];
        assert_eq!(
            build_tree_labels(&paths),
            vec!["/", "└─ a/", "   └─ x/", "      └─ deep/"]
        );
    }

    #[test]
    fn selection_tree_adds_ancestors_and_marks() {
        let out = render_selection_tree(&[p("docs/2024"), p("media")]);
        assert_eq!(out, "/\n├─ docs/\n│  └─ 2024/ [x]\n└─ media/ [x]\n");
    }

    #[test]
    fn siblings_sort_by_segment_not_joined_string() {
        let out = render_selection_tree(&[p("a-c"), p("a/b")]);
        assert_eq!(out, "/\n├─ a/\n│  └─ b/ [x]\n└─ a-c/ [x]\n");
    }
}
