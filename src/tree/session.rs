use super::node::{ExpandOutcome, NodePhase, TreeNode};
use crate::lister::{DirectoryEntry, DirectoryLister};
use crate::selection::{NodeState, PathSegments, SelectionSet, optimize_paths, resolve};
use std::collections::HashMap;

pub const DEFAULT_AUTO_EXPAND_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Clicking a node navigates to it.
    Single,
    /// Clicking a node ticks or unticks it.
    #[default]
    Multi,
}

#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub mode: SelectMode,
    /// Passed through to every listing call.
    pub force_root: bool,
    /// Open the nodes leading to the navigation target whenever it changes.
    pub auto_open: bool,
    /// Nodes shallower than this open automatically around selected paths.
    pub auto_expand_depth: usize,
    pub show_hidden: bool,
    /// Permitted roots. Empty means the whole tree from `/`.
    pub scopes: Vec<PathSegments>,
    pub credential: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            mode: SelectMode::Multi,
            force_root: true,
            auto_open: false,
            auto_expand_depth: DEFAULT_AUTO_EXPAND_DEPTH,
            show_hidden: true,
            scopes: Vec::new(),
            credential: String::new(),
        }
    }
}

/// One line of the materialized tree, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: PathSegments,
    /// Indentation below the row's tree root.
    pub level: usize,
    pub phase: NodePhase,
    pub state: NodeState,
    /// Matches the navigation target.
    pub active: bool,
    /// Loaded and known to have no sub-directories.
    pub empty: bool,
}

impl TreeRow {
    pub fn label(&self) -> String {
        if self.level == 0 {
            if self.path.is_root() {
                "root".to_string()
            } else {
                self.path.to_slash_path()
            }
        } else {
            self.path.name().unwrap_or_default().to_string()
        }
    }
}

type ChangeObserver = Box<dyn FnMut(&[String])>;
type NavigateObserver = Box<dyn FnMut(&str)>;

/// One tree-selection session: the selection set, every materialized node
/// and its cached children, and the observers to notify on change.
///
/// All mutations are synchronous. After each one the auto-expand rule is
/// re-evaluated over the visible tree.
pub struct TreeSession<L> {
    lister: L,
    options: TreeOptions,
    selection: SelectionSet,
    current: PathSegments,
    nodes: HashMap<String, TreeNode>,
    change_observers: Vec<ChangeObserver>,
    navigate_observers: Vec<NavigateObserver>,
}

impl<L: DirectoryLister> TreeSession<L> {
    pub fn new(lister: L, options: TreeOptions) -> Self {
        TreeSession {
            lister,
            options,
            selection: SelectionSet::new(),
            current: PathSegments::root(),
            nodes: HashMap::new(),
            change_observers: Vec::new(),
            navigate_observers: Vec::new(),
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn current(&self) -> &PathSegments {
        &self.current
    }

    pub fn node(&self, path: &PathSegments) -> Option<&TreeNode> {
        self.nodes.get(&path.key())
    }

    /// Registers a callback receiving the whole selection, as leading-slash
    /// strings, after every selection mutation.
    pub fn on_change(&mut self, observer: impl FnMut(&[String]) + 'static) {
        self.change_observers.push(Box::new(observer));
    }

    /// Registers a callback receiving the navigation target in single-select mode.
    pub fn on_navigate(&mut self, observer: impl FnMut(&str) + 'static) {
        self.navigate_observers.push(Box::new(observer));
    }

    pub fn roots(&self) -> Vec<PathSegments> {
        if self.options.scopes.is_empty() {
            vec![PathSegments::root()]
        } else {
            self.options.scopes.clone()
        }
    }

    /// Replaces the selection from outside (e.g. a stored value). Observers
    /// are not notified since the change did not come from the tree.
    pub fn set_selection(&mut self, selection: SelectionSet) {
        self.selection = selection;
        self.sync();
    }

    pub fn state_of(&self, path: &PathSegments) -> NodeState {
        let children = self.node(path).and_then(TreeNode::children);
        resolve(path, &self.selection, children)
    }

    pub fn is_active(&self, path: &PathSegments) -> bool {
        *path == self.current
    }

    /// Click on a node's label: tick/untick in multi-select, navigate otherwise.
    pub fn activate(&mut self, path: &PathSegments) {
        match self.options.mode {
            SelectMode::Multi => self.toggle_selection(path),
            SelectMode::Single => self.navigate(path),
        }
    }

    /// Flips the node's checked state. When ticking, its direct children are
    /// taken from the cache or fetched; a failed fetch selects just the node.
    pub fn toggle_selection(&mut self, path: &PathSegments) {
        let next_checked = !self.state_of(path).checked;
        let child_paths = if next_checked {
            self.child_paths(path)
        } else {
            Vec::new()
        };
        self.select(path, next_checked, &child_paths);
    }

    /// Applies a check/uncheck decision with a known child list.
    pub fn select(&mut self, path: &PathSegments, checked: bool, child_paths: &[PathSegments]) {
        self.selection.toggle(path, checked, child_paths);
        tracing::debug!(
            path = %path,
            checked,
            selected = self.selection.len(),
            "selection changed"
        );
        self.notify_change();
        self.sync();
    }

    pub fn navigate(&mut self, path: &PathSegments) {
        self.current = path.clone();
        let target = path.to_slash_path();
        for observer in &mut self.navigate_observers {
            observer(&target);
        }
        if self.options.auto_open {
            self.reveal_current();
        }
        self.sync();
    }

    pub fn expand(&mut self, path: &PathSegments) {
        let outcome = self.node_mut(path).expand_manually();
        if outcome == ExpandOutcome::NeedsLoad {
            self.load(path);
        }
        self.sync();
    }

    pub fn collapse(&mut self, path: &PathSegments) {
        self.node_mut(path).collapse_manually();
        for node in self.nodes.values_mut() {
            if path.is_proper_prefix_of(node.path()) {
                node.unmount();
            }
        }
        self.sync();
    }

    pub fn toggle_expand(&mut self, path: &PathSegments) {
        if self.node(path).is_some_and(TreeNode::is_open) {
            self.collapse(path);
        } else {
            self.expand(path);
        }
    }

    /// Drops the node's cached children, fetching again if it is open.
    pub fn refresh(&mut self, path: &PathSegments) {
        if self.node_mut(path).invalidate() {
            self.load(path);
        }
        self.sync();
    }

    /// Ends the session in place: nodes, cached listings, selection and
    /// navigation target are all dropped. Observers stay registered.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.selection.clear();
        self.current = PathSegments::root();
    }

    /// The selection compressed for submission.
    pub fn optimized_selection(&self) -> Vec<PathSegments> {
        optimize_paths(
            self.selection.as_slice(),
            &self.lister,
            &self.options.credential,
            self.options.force_root,
        )
    }

    /// Re-evaluates auto-expansion over every visible node, loading the
    /// nodes it opens.
    pub fn sync(&mut self) {
        let mut pending: Vec<PathSegments> = self.roots().into_iter().rev().collect();
        while let Some(path) = pending.pop() {
            if self.should_auto_expand(&path)
                && self.node_mut(&path).expand_automatically() == ExpandOutcome::NeedsLoad
            {
                tracing::debug!(path = %path, "auto-expanding");
                self.load(&path);
            }
            pending.extend(self.visible_children(&path).into_iter().rev());
        }
    }

    /// Visible rows in depth-first display order.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut pending: Vec<(PathSegments, usize)> =
            self.roots().into_iter().rev().map(|p| (p, 0)).collect();
        while let Some((path, level)) = pending.pop() {
            if !self.is_shown(&path) {
                continue;
            }
            let node = self.node(&path);
            rows.push(TreeRow {
                phase: node.map_or(NodePhase::Collapsed, TreeNode::phase),
                state: self.state_of(&path),
                active: self.is_active(&path),
                empty: node.and_then(TreeNode::children).is_some_and(<[_]>::is_empty),
                path: path.clone(),
                level,
            });
            pending.extend(
                self.visible_children(&path)
                    .into_iter()
                    .rev()
                    .map(|child| (child, level + 1)),
            );
        }
        rows
    }

    fn should_auto_expand(&self, path: &PathSegments) -> bool {
        if path.is_root() && !self.selection.is_empty() {
            return true;
        }
        path.depth() < self.options.auto_expand_depth && self.selection.has_descendant_of(path)
    }

    /// Opens the nodes on the way to the navigation target.
    fn reveal_current(&mut self) {
        let mut pending = self.roots();
        while let Some(path) = pending.pop() {
            if path.depth() >= self.options.auto_expand_depth || !path.covers(&self.current) {
                continue;
            }
            if self.node_mut(&path).expand_manually() == ExpandOutcome::NeedsLoad {
                self.load(&path);
            }
            pending.extend(self.visible_children(&path));
        }
    }

    fn is_shown(&self, path: &PathSegments) -> bool {
        self.options.show_hidden || !path.is_hidden() || path.covers(&self.current)
    }

    fn visible_children(&self, path: &PathSegments) -> Vec<PathSegments> {
        let Some(node) = self.node(path) else {
            return Vec::new();
        };
        if node.phase() != NodePhase::Expanded {
            return Vec::new();
        }
        node.children()
            .unwrap_or_default()
            .iter()
            .map(|entry| path.child(&entry.name))
            .filter(|child| self.is_shown(child))
            .collect()
    }

    fn child_paths(&mut self, path: &PathSegments) -> Vec<PathSegments> {
        if self.node(path).and_then(TreeNode::children).is_none() {
            self.load(path);
        }
        self.node(path)
            .and_then(TreeNode::children)
            .unwrap_or_default()
            .iter()
            .map(|entry| path.child(&entry.name))
            .collect()
    }

    fn load(&mut self, path: &PathSegments) {
        let result = self
            .lister
            .list_directories(path, &self.options.credential, self.options.force_root)
            .map(|entries| self.within_scopes(path, entries));
        self.node_mut(path).finish_load(result);
    }

    fn within_scopes(&self, parent: &PathSegments, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
        if self.options.scopes.is_empty() {
            return entries;
        }
        entries
            .into_iter()
            .filter(|entry| {
                let child = parent.child(&entry.name);
                self.options.scopes.iter().any(|scope| scope.covers(&child))
            })
            .collect()
    }

    fn node_mut(&mut self, path: &PathSegments) -> &mut TreeNode {
        self.nodes
            .entry(path.key())
            .or_insert_with(|| TreeNode::new(path.clone()))
    }

    fn notify_change(&mut self) {
        let paths = self.selection.to_slash_paths();
        for observer in &mut self.change_observers {
            observer(&paths);
        }
    }
}
