//! core::closure
//!
//! Transitive module dependencies read from manifests.
//!
//! # Search paths
//!
//! Module lookup goes through an explicit [`SearchPath`], built per request
//! from the caller's addons path. The first directory containing an
//! installable module of the wanted name wins.
//!
//! # Missing modules
//!
//! A seed module that cannot be found is a configuration error
//! ([`CollectError::ModuleNotFound`]). A dependency that cannot be found is
//! skipped: it may belong to a repository that is not part of this run.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::manifest::{self, Manifest, ManifestError};

/// Errors from dependency collection.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("module '{module}' not found in addons paths: {paths}")]
    ModuleNotFound { module: String, paths: SearchPath },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Ordered list of addons directories to look modules up in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build from directories, dropping duplicates after the first.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut out: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let dir = dir.into();
            if !out.contains(&dir) {
                out.push(dir);
            }
        }
        Self { dirs: out }
    }

    /// Parse a comma separated addons path such as `/a/addons,/b/addons`.
    ///
    /// # Example
    ///
    /// ```
    /// use addonkit::core::closure::SearchPath;
    ///
    /// let paths = SearchPath::parse("/odoo/addons, /build,,/odoo/addons");
    /// assert_eq!(paths.dirs().len(), 2);
    /// ```
    pub fn parse(addons_path: &str) -> Self {
        Self::new(parse_list(addons_path))
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Manifest path of installable module `module`, if any directory has it.
    pub fn find(&self, module: &str) -> Result<Option<PathBuf>, ManifestError> {
        manifest::find_module(module, &self.dirs)
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Split a comma separated list, trimming items and dropping empty ones.
///
/// # Example
///
/// ```
/// use addonkit::core::closure::parse_list;
///
/// assert_eq!(parse_list(" sale, ,stock ,"), vec!["sale", "stock"]);
/// ```
pub fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect `seeds` and everything they transitively depend on.
///
/// Dependencies that are not found in `paths` are left out of the result,
/// so feeding the result back in as seeds returns the same set.
///
/// # Errors
///
/// - [`CollectError::ModuleNotFound`] if a seed is not found
/// - [`CollectError::Manifest`] if a manifest cannot be read or parsed
pub fn collect<I, S>(paths: &SearchPath, seeds: I) -> Result<BTreeSet<String>, CollectError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let seeds: BTreeSet<String> = seeds.into_iter().map(Into::into).collect();
    let mut pending: BTreeSet<String> = seeds.clone();
    let mut found = BTreeSet::new();
    let mut visited = BTreeSet::new();

    while let Some(module) = pending.pop_first() {
        if !visited.insert(module.clone()) {
            continue;
        }

        let Some(manifest_path) = paths.find(&module)? else {
            if seeds.contains(&module) {
                return Err(CollectError::ModuleNotFound {
                    module,
                    paths: paths.clone(),
                });
            }
            warn!(module = %module, "dependency not found in addons paths, skipping");
            continue;
        };

        let manifest = Manifest::load(&manifest_path)?;
        let depends = manifest.depends();
        debug!(module = %module, depends = ?depends, "collected module");
        pending.extend(depends.into_iter().filter(|dep| !visited.contains(dep)));
        found.insert(module);
    }

    Ok(found)
}

/// Direct dependencies of the modules under test plus `base`, excluding the
/// modules under test.
///
/// These are the modules to preinstall before testing `modules`. `base` is
/// always preinstalled unless it is itself under test. Modules under test
/// that are not found are skipped.
pub fn test_dependencies(
    paths: &SearchPath,
    modules: &[String],
) -> Result<BTreeSet<String>, CollectError> {
    let mut depends = BTreeSet::from(["base".to_string()]);
    for module in modules {
        match paths.find(module)? {
            Some(manifest_path) => {
                depends.extend(Manifest::load(&manifest_path)?.depends());
            }
            None => debug!(module = %module, "module under test not found, skipping"),
        }
    }

    for module in modules {
        depends.remove(module);
    }
    Ok(depends)
}

/// Convenience for a single addons directory.
pub fn collect_in<I, S>(dir: &Path, seeds: I) -> Result<BTreeSet<String>, CollectError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    collect(&SearchPath::new([dir]), seeds)
}
