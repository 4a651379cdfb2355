//! Lazily loaded directory tree backing the folder picker.

mod node;
mod session;

pub use node::{ExpandOutcome, NodePhase, TreeNode};
pub use session::{DEFAULT_AUTO_EXPAND_DEPTH, SelectMode, TreeOptions, TreeRow, TreeSession};
