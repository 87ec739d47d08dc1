//! Integration tests for the git interface.
//!
//! These tests create real git repositories in temporary directories and
//! verify that changed paths map onto the right modules.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use addonkit::core::changed::{modules_changed, strip_item_prefix};
use addonkit::git::{Git, GitError};

/// Test fixture: a git repository seeded with one commit.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Addons\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-q", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an installable module under `parent` (relative to the repo).
    fn add_module(&self, parent: &str, name: &str) {
        let dir = self.path().join(parent).join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("__init__.py"), "").unwrap();
        std::fs::write(
            dir.join("__manifest__.py"),
            format!("{{'name': '{}', 'depends': ['base']}}", name),
        )
        .unwrap();
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn commit_all(&self, message: &str) {
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "-q", "-m", message]);
    }

    fn tag(&self, name: &str) {
        run_git(self.path(), &["tag", name]);
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// =============================================================================
// Repository Opening Tests
// =============================================================================

#[test]
fn open_valid_repository() {
    let repo = TestRepo::new();
    assert!(Git::open(repo.path()).is_ok());
}

#[test]
fn open_from_subdirectory() {
    let repo = TestRepo::new();
    repo.add_module("", "sale");
    let git = Git::open(&repo.path().join("sale")).unwrap();
    assert_eq!(
        git.work_dir().unwrap().canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

#[test]
fn open_non_repository() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Git::open(dir.path()),
        Err(GitError::NotARepo { .. })
    ));
}

// =============================================================================
// Diff Tests
// =============================================================================

#[test]
fn items_changed_lists_paths_between_revisions() {
    let repo = TestRepo::new();
    repo.tag("base");
    repo.add_module("", "sale");
    repo.write("setup.cfg", "[metadata]\n");
    repo.commit_all("Add sale");

    let git = Git::open(repo.path()).unwrap();
    let items = git.items_changed("base", None).unwrap();
    assert_eq!(
        items,
        vec!["sale/__init__.py", "sale/__manifest__.py", "setup.cfg"]
    );
}

#[test]
fn items_changed_with_explicit_target() {
    let repo = TestRepo::new();
    repo.tag("base");
    repo.add_module("", "sale");
    repo.commit_all("Add sale");
    repo.tag("middle");
    repo.add_module("", "stock");
    repo.commit_all("Add stock");

    let git = Git::open(repo.path()).unwrap();
    let items = git.items_changed("base", Some("middle")).unwrap();
    assert!(items.iter().all(|item| item.starts_with("sale/")));
}

#[test]
fn items_changed_includes_renamed_from_paths() {
    let repo = TestRepo::new();
    repo.add_module("", "sale");
    repo.commit_all("Add sale");
    repo.tag("base");
    run_git(repo.path(), &["mv", "sale", "sale_renamed"]);
    repo.commit_all("Rename");

    let git = Git::open(repo.path()).unwrap();
    let items = git.items_changed("base", None).unwrap();
    assert!(items.iter().any(|item| item.starts_with("sale/")));
    assert!(items.iter().any(|item| item.starts_with("sale_renamed/")));
}

#[test]
fn unknown_revision_is_an_error() {
    let repo = TestRepo::new();
    let git = Git::open(repo.path()).unwrap();
    assert!(matches!(
        git.items_changed("no-such-branch", None),
        Err(GitError::RevisionNotFound { .. })
    ));
}

#[test]
fn identical_revisions_have_no_changes() {
    let repo = TestRepo::new();
    let git = Git::open(repo.path()).unwrap();
    assert!(git.items_changed("HEAD", Some("HEAD")).unwrap().is_empty());
}

// =============================================================================
// Changed Modules Tests
// =============================================================================

#[test]
fn changed_modules_at_repository_root() {
    let repo = TestRepo::new();
    repo.add_module("", "sale");
    repo.add_module("", "stock");
    repo.commit_all("Add modules");
    repo.tag("base");

    repo.write("sale/models/order.py", "# order\n");
    repo.write("README.md", "# Changed\n");
    repo.commit_all("Touch sale");

    let git = Git::open(repo.path()).unwrap();
    let items = git.items_changed("base", None).unwrap();
    let modules = modules_changed(repo.path(), &items).unwrap();
    let names: Vec<_> = modules.iter().map(|m| m.as_str()).collect();
    assert_eq!(names, vec!["sale"]);
}

#[test]
fn changed_modules_in_addons_subdirectory() {
    let repo = TestRepo::new();
    repo.add_module("addons", "sale");
    repo.add_module("addons", "stock");
    repo.commit_all("Add modules");
    repo.tag("base");

    repo.write("addons/stock/views.xml", "<odoo/>\n");
    repo.commit_all("Touch stock");

    let git = Git::open(repo.path()).unwrap();
    let items = git.items_changed("base", None).unwrap();
    let items = strip_item_prefix(&items, Path::new("addons"));
    let modules = modules_changed(&repo.path().join("addons"), &items).unwrap();
    let names: Vec<_> = modules.iter().map(|m| m.as_str()).collect();
    assert_eq!(names, vec!["stock"]);
}
