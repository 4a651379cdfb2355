use super::path::PathSegments;
use super::set::SelectionSet;
use crate::lister::DirectoryEntry;

/// Tri-state checkbox value of one node. Never stored; always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeState {
    pub checked: bool,
    pub indeterminate: bool,
}

impl NodeState {
    pub const CHECKED: NodeState = NodeState {
        checked: true,
        indeterminate: false,
    };
    pub const INDETERMINATE: NodeState = NodeState {
        checked: false,
        indeterminate: true,
    };
    pub const UNCHECKED: NodeState = NodeState {
        checked: false,
        indeterminate: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildMark {
    Selected,
    DescendantSelected,
    Unselected,
}

/// Computes the display state of the node at `path`.
///
/// `children` is the node's loaded child list, `None` while not yet fetched.
/// A direct hit in `selection` always wins; otherwise an unloaded or empty
/// node is indeterminate when something below it is selected, and a loaded
/// node is judged from its direct children.
pub fn resolve(
    path: &PathSegments,
    selection: &SelectionSet,
    children: Option<&[DirectoryEntry]>,
) -> NodeState {
    if selection.contains(path) {
        return NodeState::CHECKED;
    }

    let children = match children {
        Some(children) if !children.is_empty() => children,
        _ => {
            return if selection.has_descendant_of(path) {
                NodeState::INDETERMINATE
            } else {
                NodeState::UNCHECKED
            };
        }
    };

    let marks: Vec<ChildMark> = children
        .iter()
        .map(|entry| {
            let child = path.child(&entry.name);
            if selection.contains(&child) {
                ChildMark::Selected
            } else if selection.has_descendant_of(&child) {
                ChildMark::DescendantSelected
            } else {
                ChildMark::Unselected
            }
        })
        .collect();

    if marks.iter().all(|m| *m == ChildMark::Selected) {
        NodeState::CHECKED
    } else if marks.iter().any(|m| *m != ChildMark::Unselected) {
        NodeState::INDETERMINATE
    } else {
        NodeState::UNCHECKED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(s: &str) -> PathSegments {
        PathSegments::parse(s)
    }

    fn dirs(names: &[&str]) -> Vec<DirectoryEntry> {
        names.iter().map(|n| DirectoryEntry::dir(*n)).collect()
    }

    fn set(paths: &[&str]) -> SelectionSet {
        paths.iter().map(|s| p(s)).collect()
    }

    #[test]
    fn direct_selection_wins_over_children() {
        let children = dirs(&["x", "y"]);
        let state = resolve(&p("n"), &set(&["n"]), Some(&children));
        assert_eq!(state, NodeState::CHECKED);
    }

    #[test]
    fn all_children_selected_checks_parent() {
        let children = dirs(&["x", "y"]);
        let state = resolve(&p("n"), &set(&["n/x", "n/y"]), Some(&children));
        assert_eq!(state, NodeState::CHECKED);
    }

    #[test]
    fn some_children_selected_is_indeterminate() {
        let children = dirs(&["x", "y"]);
        let state = resolve(&p("n"), &set(&["n/x"]), Some(&children));
        assert_eq!(state, NodeState::INDETERMINATE);
    }

    #[test]
    fn deep_selection_under_child_is_indeterminate() {
        let children = dirs(&["x", "y"]);
        let state = resolve(&p("n"), &set(&["n/y/deep"]), Some(&children));
        assert_eq!(state, NodeState::INDETERMINATE);
    }

    #[test]
    fn unloaded_node_with_descendant_is_indeterminate() {
        assert_eq!(resolve(&p("n"), &set(&["n/a/b"]), None), NodeState::INDETERMINATE);
        assert_eq!(resolve(&p("n"), &set(&["n/a/b"]), Some(&[])), NodeState::INDETERMINATE);
    }

    #[test]
    fn unrelated_selection_is_unchecked() {
        assert_eq!(resolve(&p("n"), &set(&["nx/a", "m"]), None), NodeState::UNCHECKED);
        let children = dirs(&["x"]);
        assert_eq!(resolve(&p("n"), &set(&["m/x"]), Some(&children)), NodeState::UNCHECKED);
    }

    #[test]
    fn root_reflects_anything_selected() {
        assert_eq!(resolve(&PathSegments::root(), &set(&["a"]), None), NodeState::INDETERMINATE);
        assert_eq!(resolve(&PathSegments::root(), &set(&[]), None), NodeState::UNCHECKED);
    }

    fn path_strategy() -> impl Strategy<Value = PathSegments> {
        proptest::collection::vec("[a-c]", 0..4).prop_map(PathSegments::new)
    }

    proptest! {
        #[test]
        fn selected_node_is_always_checked_and_never_indeterminate(
            node in path_strategy(),
            others in proptest::collection::vec(path_strategy(), 0..10),
            child_names in proptest::option::of(proptest::collection::vec("[a-c]", 0..4)),
        ) {
            let mut selection: SelectionSet = others.into_iter().collect();
            selection.insert(node.clone());
            let children: Option<Vec<DirectoryEntry>> =
                child_names.map(|names| names.into_iter().map(DirectoryEntry::dir).collect());
            let state = resolve(&node, &selection, children.as_deref());
            prop_assert!(state.checked);
            prop_assert!(!state.indeterminate);
        }

        #[test]
        fn checked_and_indeterminate_are_exclusive(
            node in path_strategy(),
            selection in proptest::collection::vec(path_strategy(), 0..10),
            child_names in proptest::option::of(proptest::collection::vec("[a-c]", 0..4)),
        ) {
            let selection: SelectionSet = selection.into_iter().collect();
            let children: Option<Vec<DirectoryEntry>> =
                child_names.map(|names| names.into_iter().map(DirectoryEntry::dir).collect());
            let state = resolve(&node, &selection, children.as_deref());
            prop_assert!(!(state.checked && state.indeterminate));
        }
    }
}
