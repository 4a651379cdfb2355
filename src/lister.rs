use crate::error::ListError;
use crate::selection::PathSegments;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// One child returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
}

impl DirectoryEntry {
    pub fn dir<S: Into<String>>(name: S) -> Self {
        DirectoryEntry {
            name: name.into(),
            is_directory: true,
        }
    }

    pub fn file<S: Into<String>>(name: S) -> Self {
        DirectoryEntry {
            name: name.into(),
            is_directory: false,
        }
    }
}

/// The directory-listing backend the selection engine consults.
///
/// Implementations return the directory children of `path`. When
/// `force_root` is false the path is interpreted relative to the caller's
/// base scope rather than the backend root.
pub trait DirectoryLister {
    fn list_directories(
        &self,
        path: &PathSegments,
        credential: &str,
        force_root: bool,
    ) -> Result<Vec<DirectoryEntry>, ListError>;
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for &T {
    fn list_directories(
        &self,
        path: &PathSegments,
        credential: &str,
        force_root: bool,
    ) -> Result<Vec<DirectoryEntry>, ListError> {
        (**self).list_directories(path, credential, force_root)
    }
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for Box<T> {
    fn list_directories(
        &self,
        path: &PathSegments,
        credential: &str,
        force_root: bool,
    ) -> Result<Vec<DirectoryEntry>, ListError> {
        (**self).list_directories(path, credential, force_root)
    }
}

/// Serves directory listings from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalLister {
    root: PathBuf,
    base: PathSegments,
    password: Option<String>,
    show_hidden: bool,
    include_ignored: bool,
}

impl LocalLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalLister {
            root: root.into(),
            base: PathSegments::root(),
            password: None,
            show_hidden: true,
            include_ignored: true,
        }
    }

    /// Scope applied to requests made without `force_root`.
    pub fn base(mut self, base: PathSegments) -> Self {
        self.base = base;
        self
    }

    /// Listings fail with [`ListError::Unauthorized`] unless the credential matches.
    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.show_hidden = yes;
        self
    }

    pub fn include_ignored(mut self, yes: bool) -> Self {
        self.include_ignored = yes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &PathSegments, force_root: bool) -> Result<PathBuf, ListError> {
        let scoped = if force_root {
            path.segments().to_vec()
        } else {
            self.base
                .segments()
                .iter()
                .chain(path.segments())
                .cloned()
                .collect()
        };
        let mut resolved = self.root.clone();
        for segment in &scoped {
            if segment.is_empty()
                || segment == ".."
                || segment == "."
                || segment.contains(['/', '\\', '\0'])
                || Path::new(segment).has_root()
            {
                return Err(ListError::PathEscape {
                    path: path.to_slash_path(),
                    root: self.root.clone(),
                });
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }
}

impl DirectoryLister for LocalLister {
    fn list_directories(
        &self,
        path: &PathSegments,
        credential: &str,
        force_root: bool,
    ) -> Result<Vec<DirectoryEntry>, ListError> {
        if let Some(expected) = &self.password {
            if expected != credential {
                return Err(ListError::Unauthorized {
                    path: path.to_slash_path(),
                });
            }
        }

        let dir = self.resolve(path, force_root)?;
        let metadata = match fs::metadata(&dir) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ListError::NotFound { path: dir });
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(ListError::NotADirectory { path: dir });
        }

        let mut walker = WalkBuilder::new(&dir);
        walker
            .max_depth(Some(1))
            .hidden(!self.show_hidden)
            .parents(false);
        if self.include_ignored {
            walker.git_ignore(false).git_exclude(false).git_global(false).ignore(false);
        }

        let mut entries = Vec::new();
        for result in walker.build() {
            let dirent = match result {
                Ok(v) => v,
                // The directory itself could not be read.
                Err(e) if e.depth().unwrap_or(0) == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if dirent.depth() == 0 {
                continue;
            }
            let is_dir = dirent.file_type().is_some_and(|t| t.is_dir());
            if !is_dir {
                continue;
            }
            entries.push(DirectoryEntry::dir(
                dirent.file_name().to_string_lossy().into_owned(),
            ));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
