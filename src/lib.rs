//! Folder-tree selection: tick directories in a lazily loaded tree, then
//! compress the ticked set to the fewest covering paths.
//!
//! The engine lives in [`selection`] and [`tree`] and talks to storage only
//! through [`lister::DirectoryLister`]. Everything else is the command-line
//! front-end around it.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod lister;
pub mod scope;
pub mod selection;
pub mod tree;
pub mod tree_builder;
pub mod tui;
pub mod workflow;

pub use error::ListError;
pub use lister::{DirectoryEntry, DirectoryLister, LocalLister};
pub use selection::{NodeState, PathSegments, SelectionSet, optimize_paths, resolve};
pub use tree::{SelectMode, TreeOptions, TreeSession};
