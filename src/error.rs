//! Error types for directory listing.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of one directory-listing call.
///
/// The selection engine never propagates these: a failed listing counts as a
/// directory with no children.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Path climbs out of the served root
    #[error("path '{path}' escapes root '{root}'")]
    PathEscape { path: String, root: PathBuf },

    #[error("wrong credential for '{path}'")]
    Unauthorized { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),
}
