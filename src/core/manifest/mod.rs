//! core::manifest
//!
//! Addon module discovery and manifest reading.
//!
//! # Module layout
//!
//! A directory is an addon module when it contains the `__init__.py` marker
//! and exactly one of the recognised manifest files ([`MANIFEST_FILES`]).
//! A module is installable unless its manifest sets `installable` to a
//! false value.
//!
//! # Parsing
//!
//! Manifests are parsed with the strict [`literal`] parser. A manifest that
//! is not valid literal data is an error, never a silent "not installable":
//! a broken manifest is an authoring bug the CI run must surface.
//!
//! # Example
//!
//! ```no_run
//! use addonkit::core::manifest::{get_modules, is_module};
//! use std::path::Path;
//!
//! if let Some(manifest) = is_module(Path::new("addons/sale")) {
//!     println!("manifest at {}", manifest.display());
//! }
//! let modules = get_modules(Path::new("addons")).unwrap();
//! println!("{} installable modules", modules.len());
//! ```

pub mod literal;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use self::literal::{Literal, LiteralError};
use crate::core::types::ModuleName;

/// Recognised manifest file names, newest first.
pub const MANIFEST_FILES: [&str; 4] = [
    "__manifest__.py",
    "__odoo__.py",
    "__openerp__.py",
    "__terp__.py",
];

/// Marker file every module directory must contain.
pub const INIT_FILE: &str = "__init__.py";

/// Errors from reading manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: LiteralError,
    },

    #[error("manifest '{path}' must be a dict literal, found {found}")]
    NotADict { path: PathBuf, found: &'static str },

    #[error("failed to list directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A parsed addon manifest.
///
/// Keys are unique; when a key is repeated the last value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: BTreeMap<String, Literal>,
}

impl Manifest {
    /// Read and parse the manifest file at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents).map_err(|e| match e {
            ParseFailure::Literal(source) => ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::NotADict(found) => ManifestError::NotADict {
                path: path.to_path_buf(),
                found,
            },
        })
    }

    /// Parse manifest source text.
    pub fn parse(source: &str) -> Result<Self, ParseFailure> {
        let value = literal::parse(source).map_err(ParseFailure::Literal)?;
        let Literal::Dict(pairs) = value else {
            return Err(ParseFailure::NotADict(value.kind()));
        };

        let mut entries = BTreeMap::new();
        for (key, value) in pairs {
            // Non-string keys are legal literals but carry no manifest meaning.
            if let Literal::Str(key) = key {
                entries.insert(key, value);
            }
        }
        Ok(Self { entries })
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Literal> {
        self.entries.get(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Names listed under `depends`, in declaration order.
    ///
    /// Non-string items are ignored; a missing key means no dependencies.
    pub fn depends(&self) -> Vec<String> {
        self.get("depends")
            .and_then(Literal::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Literal::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the module may be installed. Defaults to `true`.
    pub fn installable(&self) -> bool {
        self.get("installable").map_or(true, Literal::is_truthy)
    }

    /// Whether the module installs itself once its dependencies are present.
    pub fn auto_install(&self) -> bool {
        self.get("auto_install").is_some_and(Literal::is_truthy)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    pub fn author(&self) -> Option<&str> {
        self.get_str("author")
    }

    pub fn license(&self) -> Option<&str> {
        self.get_str("license")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Literal::as_str)
    }
}

/// Why manifest text could not become a [`Manifest`].
#[derive(Debug, Error, PartialEq)]
pub enum ParseFailure {
    #[error(transparent)]
    Literal(LiteralError),

    #[error("manifest must be a dict literal, found {0}")]
    NotADict(&'static str),
}

/// Return the manifest path if `path` holds an addon module.
///
/// `None` is the "not a module" answer: the directory is missing, has no
/// `__init__.py`, or has zero or several manifest files.
pub fn is_module(path: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(path).ok()?;

    let mut has_init = false;
    let mut manifests = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name == INIT_FILE {
            has_init = true;
        } else if MANIFEST_FILES.contains(&name) {
            manifests.push(name.to_string());
        }
    }

    if has_init && manifests.len() == 1 {
        Some(path.join(&manifests[0]))
    } else {
        None
    }
}

/// Return the manifest path if `path` holds an installable addon module.
///
/// # Errors
///
/// Propagates [`ManifestError`] when the manifest exists but cannot be read
/// or parsed.
pub fn is_installable_module(path: &Path) -> Result<Option<PathBuf>, ManifestError> {
    let Some(manifest_path) = is_module(path) else {
        return Ok(None);
    };
    let manifest = Manifest::load(&manifest_path)?;
    if manifest.installable() {
        Ok(Some(manifest_path))
    } else {
        trace!(path = %path.display(), "module is not installable");
        Ok(None)
    }
}

/// Find the manifest of installable module `module` in the first of `paths`
/// that has one.
pub fn find_module(module: &str, paths: &[PathBuf]) -> Result<Option<PathBuf>, ManifestError> {
    for path in paths {
        if let Some(manifest) = is_installable_module(&path.join(module))? {
            return Ok(Some(manifest));
        }
    }
    Ok(None)
}

/// List the installable modules directly under `root`, sorted by name.
///
/// A root that is not a directory has no modules.
pub fn get_modules(root: &Path) -> Result<Vec<ModuleName>, ManifestError> {
    let root = normalize_root(root);
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&root).map_err(|e| ManifestError::ListDir {
        path: root.clone(),
        source: e,
    })?;

    let mut modules = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Ok(name) = ModuleName::new(name) else {
            continue;
        };
        if is_installable_module(&entry.path())?.is_some() {
            modules.push(name);
        }
    }
    modules.sort();

    debug!(root = %root.display(), count = modules.len(), "found installable modules");
    Ok(modules)
}

/// Whether `root` directly contains at least one installable module.
pub fn is_addons(root: &Path) -> Result<bool, ManifestError> {
    Ok(!get_modules(root)?.is_empty())
}

/// Drop a trailing separator so `addons/` and `addons` name the same root.
fn normalize_root(root: &Path) -> PathBuf {
    root.components().collect()
}
