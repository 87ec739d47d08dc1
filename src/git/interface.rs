//! git::interface
//!
//! Git interface implementation using git2.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RevisionNotFound`]: A revision does not resolve
//! - [`GitError::BareRepo`]: The repository has no working directory
//! - [`GitError::Internal`]: Anything else reported by libgit2

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// A revision spec does not resolve to a tree.
    #[error("revision not found: {spec}")]
    RevisionNotFound {
        /// The revision that was not found
        spec: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the revision it concerned.
    fn from_git2(err: git2::Error, spec: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound
            | git2::ErrorCode::InvalidSpec
            | git2::ErrorCode::Ambiguous
            | git2::ErrorCode::UnbornBranch => GitError::RevisionNotFound {
                spec: spec.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", spec, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// The Git interface.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Root of the working directory.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Paths changed between `base` and `target` (default `HEAD`).
    ///
    /// Equivalent to `git diff --name-only base..target`. Paths are relative
    /// to the repository root, deduplicated and sorted; renames list both
    /// the old and the new path.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if either revision does not resolve
    pub fn items_changed(&self, base: &str, target: Option<&str>) -> Result<Vec<String>, GitError> {
        let target = target.unwrap_or("HEAD");
        let base_tree = self.tree_of(base)?;
        let target_tree = self.tree_of(target)?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&target_tree), None)?;

        let mut items = BTreeSet::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    items.insert(path.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        debug!(base, target, count = items.len(), "listed changed items");
        Ok(items.into_iter().collect())
    }

    fn tree_of(&self, spec: &str) -> Result<git2::Tree<'_>, GitError> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|e| GitError::from_git2(e, spec))?;
        object
            .peel_to_tree()
            .map_err(|e| GitError::from_git2(e, spec))
    }
}
