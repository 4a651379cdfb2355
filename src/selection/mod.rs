//! Hierarchical path selection: the path type, the selection set with its
//! mutator, the tri-state resolver and the path-set optimizer.

mod optimizer;
mod path;
mod resolver;
mod set;

pub use optimizer::optimize_paths;
pub use path::PathSegments;
pub use resolver::{NodeState, resolve};
pub use set::{SelectionSet, SelectionSummary};
