use crate::error::ListError;
use crate::lister::DirectoryEntry;
use crate::selection::PathSegments;

/// Expansion phase of a materialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    Collapsed,
    /// Expansion requested, listing in flight.
    Expanding,
    Expanded,
}

/// What the owner must do after asking a node to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Children must be fetched and handed to [`TreeNode::finish_load`].
    NeedsLoad,
    /// Cached children are usable; the node is already expanded.
    Ready,
    /// Nothing changed.
    Unchanged,
}

/// One directory in the tree, with its lazily fetched children.
#[derive(Debug, Clone)]
pub struct TreeNode {
    path: PathSegments,
    phase: NodePhase,
    manually_collapsed: bool,
    children: Option<Vec<DirectoryEntry>>,
}

impl TreeNode {
    pub fn new(path: PathSegments) -> Self {
        TreeNode {
            path,
            phase: NodePhase::Collapsed,
            manually_collapsed: false,
            children: None,
        }
    }

    pub fn path(&self) -> &PathSegments {
        &self.path
    }

    pub fn phase(&self) -> NodePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != NodePhase::Collapsed
    }

    pub fn manually_collapsed(&self) -> bool {
        self.manually_collapsed
    }

    /// `None` until loaded; an empty list means "loaded, no children".
    pub fn children(&self) -> Option<&[DirectoryEntry]> {
        self.children.as_deref()
    }

    /// Loading is skipped only when a non-empty child list is cached.
    pub fn needs_load(&self) -> bool {
        self.children.as_ref().is_none_or(|c| c.is_empty())
    }

    /// User opened the node. Clears the sticky collapse flag.
    pub fn expand_manually(&mut self) -> ExpandOutcome {
        self.manually_collapsed = false;
        self.open()
    }

    /// Automatic expansion; refused while the user keeps the node collapsed.
    pub fn expand_automatically(&mut self) -> ExpandOutcome {
        if self.manually_collapsed {
            return ExpandOutcome::Unchanged;
        }
        self.open()
    }

    fn open(&mut self) -> ExpandOutcome {
        match self.phase {
            NodePhase::Expanded | NodePhase::Expanding => ExpandOutcome::Unchanged,
            NodePhase::Collapsed if self.needs_load() => {
                self.phase = NodePhase::Expanding;
                ExpandOutcome::NeedsLoad
            }
            NodePhase::Collapsed => {
                self.phase = NodePhase::Expanded;
                ExpandOutcome::Ready
            }
        }
    }

    /// User closed the node; auto-expansion stays off until reopened by hand.
    pub fn collapse_manually(&mut self) {
        self.phase = NodePhase::Collapsed;
        self.manually_collapsed = true;
    }

    /// Parent closed: the node leaves the view and loses its UI state.
    pub fn unmount(&mut self) {
        self.phase = NodePhase::Collapsed;
        self.manually_collapsed = false;
    }

    /// Delivers a listing result.
    ///
    /// Success caches the directory children even if the node was collapsed
    /// meanwhile. Failure forces the node back to collapsed.
    pub fn finish_load(&mut self, result: Result<Vec<DirectoryEntry>, ListError>) {
        match result {
            Ok(entries) => {
                self.children = Some(entries.into_iter().filter(|e| e.is_directory).collect());
                if self.phase == NodePhase::Expanding {
                    self.phase = NodePhase::Expanded;
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "directory listing failed");
                self.phase = NodePhase::Collapsed;
            }
        }
    }

    /// Drops cached children. Returns true when the node is open and must reload.
    pub fn invalidate(&mut self) -> bool {
        self.children = None;
        if self.phase == NodePhase::Expanded {
            self.phase = NodePhase::Expanding;
            return true;
        }
        self.phase == NodePhase::Expanding
    }
}
