//! git
//!
//! Single interface for the Git operations addonkit needs.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. No other module imports
//! `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Listing the paths changed between two revisions
//!
//! # Example
//!
//! ```ignore
//! use addonkit::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for path in git.items_changed("origin/16.0", None)? {
//!     println!("{}", path);
//! }
//! ```

mod interface;

pub use interface::{Git, GitError};
