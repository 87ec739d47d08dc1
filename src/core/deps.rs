//! core::deps
//!
//! Repository-level dependencies declared in `oca_dependencies.txt`.
//!
//! # File format
//!
//! One dependency per line: a repository name, optionally followed by
//! whitespace and extra tokens (usually a git URL and branch). Blank lines and
//! lines starting with `#` are ignored.
//!
//! ```text
//! # OCA dependencies
//! server-tools
//! partner-contact https://github.com/OCA/partner-contact 8.0
//! ```
//!
//! Dependencies name sibling directories of the declaring addons root. They
//! usually have been cloned next to it by the CI setup, but nothing here
//! requires them to exist.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::graph::DependencyGraph;
use super::level::resolve_levels;
use super::manifest::{self, ManifestError};
use super::order::sorted_keys;

/// Default dependency declaration file name.
pub const DEPENDENCY_FILE: &str = "oca_dependencies.txt";

/// Errors from reading dependency declarations.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("failed to read dependency file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// One line of a dependency file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Repository (directory) name.
    pub name: String,
    /// Remaining tokens, joined by a space. Unused by ordering.
    pub source: Option<String>,
}

/// Parse dependency file contents.
///
/// # Example
///
/// ```
/// use addonkit::core::deps::parse_dependency_file;
///
/// let entries = parse_dependency_file("# comment\n\nweb\nreporting-engine https://x 8.0\n");
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].name, "reporting-engine");
/// assert_eq!(entries[1].source.as_deref(), Some("https://x 8.0"));
/// ```
pub fn parse_dependency_file(contents: &str) -> Vec<DependencyEntry> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?.to_string();
            let rest: Vec<&str> = tokens.collect();
            let source = (!rest.is_empty()).then(|| rest.join(" "));
            Some(DependencyEntry { name, source })
        })
        .collect()
}

/// Dependency names declared by the addons root at `addon_path`.
///
/// A missing dependency file means no dependencies.
pub fn read_dependencies(addon_path: &Path) -> Result<Vec<String>, DependencyError> {
    read_dependencies_from(addon_path, DEPENDENCY_FILE)
}

/// Like [`read_dependencies`] with a custom dependency file name.
pub fn read_dependencies_from(
    addon_path: &Path,
    file_name: &str,
) -> Result<Vec<String>, DependencyError> {
    let path = addon_path.join(file_name);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DependencyError::Read { path, source: e }),
    };
    Ok(parse_dependency_file(&contents)
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

/// Options for addons root discovery.
#[derive(Debug, Clone)]
pub struct AddonsOptions {
    /// Name of the per-root dependency declaration file.
    pub dependency_file: String,
}

impl Default for AddonsOptions {
    fn default() -> Self {
        Self {
            dependency_file: DEPENDENCY_FILE.to_string(),
        }
    }
}

/// Find the addons roots at or directly below `root`, in install order.
///
/// `root` is the single addons root when it directly contains installable
/// modules. Otherwise every immediate subdirectory that does is a root.
/// Declared repository dependencies are included as sibling paths, ordered
/// after the roots that need them.
pub fn get_addons(root: &Path, options: &AddonsOptions) -> Result<Vec<PathBuf>, DependencyError> {
    let roots = addons_roots(root)?;
    let graph = build_graph(&roots, options)?;
    let levels = resolve_levels(&graph);
    Ok(sorted_keys(&graph, &levels))
}

/// Addons roots at or directly below `root`, sorted by path.
pub fn addons_roots(root: &Path) -> Result<Vec<PathBuf>, DependencyError> {
    if manifest::is_addons(root)? {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(root).map_err(|e| DependencyError::ListDir {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut roots = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() && manifest::is_addons(&path)? {
            roots.push(path);
        }
    }
    roots.sort();
    Ok(roots)
}

/// Dependency graph of the given addons roots.
pub fn build_graph(
    roots: &[PathBuf],
    options: &AddonsOptions,
) -> Result<DependencyGraph, DependencyError> {
    let mut entries = Vec::with_capacity(roots.len());
    for root in roots {
        let deps = read_dependencies_from(root, &options.dependency_file)?;
        debug!(root = %root.display(), deps = ?deps, "read repository dependencies");
        entries.push((root.clone(), deps));
    }
    Ok(DependencyGraph::build(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_module(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("__init__.py"), "").unwrap();
        fs::write(dir.join("__manifest__.py"), "{'depends': ['base']}").unwrap();
    }

    #[test]
    fn parse_ignores_comments_and_blank_lines() {
        let entries = parse_dependency_file("\n# heading\n  web  \n\t\n#x y\n");
        assert_eq!(
            entries,
            vec![DependencyEntry {
                name: "web".to_string(),
                source: None
            }]
        );
    }

    #[test]
    fn missing_file_means_no_dependencies() {
        let tmp = TempDir::new().unwrap();
        assert!(read_dependencies(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn read_keeps_first_token_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DEPENDENCY_FILE),
            "server-tools https://github.com/OCA/server-tools 8.0\nweb\n",
        )
        .unwrap();
        assert_eq!(
            read_dependencies(tmp.path()).unwrap(),
            vec!["server-tools", "web"]
        );
    }

    #[test]
    fn root_with_modules_is_its_own_addons_root() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "sale_extra");
        assert_eq!(addons_roots(tmp.path()).unwrap(), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn get_addons_orders_repositories_before_their_dependencies() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        let tools = tmp.path().join("server-tools");
        let web = tmp.path().join("web");
        write_module(&build, "my_module");
        write_module(&tools, "base_tool");
        write_module(&web, "web_widget");
        fs::write(build.join(DEPENDENCY_FILE), "server-tools\nweb\n").unwrap();
        fs::write(web.join(DEPENDENCY_FILE), "server-tools\n").unwrap();

        let addons = get_addons(tmp.path(), &AddonsOptions::default()).unwrap();
        assert_eq!(addons, vec![build, web, tools]);
    }

    #[test]
    fn get_addons_keeps_virtual_dependency_paths() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        write_module(&build, "my_module");
        fs::write(build.join(DEPENDENCY_FILE), "not-cloned\n").unwrap();

        let addons = get_addons(tmp.path(), &AddonsOptions::default()).unwrap();
        assert_eq!(addons, vec![build, tmp.path().join("not-cloned")]);
    }

    #[test]
    fn custom_dependency_file_name() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        write_module(&build, "my_module");
        fs::write(build.join("deps.txt"), "other\n").unwrap();

        let options = AddonsOptions {
            dependency_file: "deps.txt".to_string(),
        };
        let addons = get_addons(tmp.path(), &options).unwrap();
        assert_eq!(addons.len(), 2);
    }
}
