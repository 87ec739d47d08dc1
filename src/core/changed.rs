//! core::changed
//!
//! Map changed file paths onto the modules they belong to.
//!
//! Only the first path segment matters: a change to `sale/models/order.py`
//! touches module `sale` if `sale` is an installable module of the root.
//! Top-level files (no `/`) never touch a module.

use std::collections::BTreeSet;
use std::path::Path;

use super::manifest::{get_modules, ManifestError};
use super::types::ModuleName;

/// Installable modules of `root` touched by any of `items`, sorted.
///
/// # Example
///
/// ```no_run
/// use addonkit::core::changed::modules_changed;
/// use std::path::Path;
///
/// let items = vec!["sale/models/order.py".to_string(), "README.md".to_string()];
/// let touched = modules_changed(Path::new("."), &items).unwrap();
/// ```
pub fn modules_changed(root: &Path, items: &[String]) -> Result<Vec<ModuleName>, ManifestError> {
    let folders: BTreeSet<&str> = items
        .iter()
        .filter_map(|item| item.split_once('/').map(|(head, _)| head))
        .collect();

    Ok(get_modules(root)?
        .into_iter()
        .filter(|module| folders.contains(module.as_str()))
        .collect())
}

/// Re-root repository-relative `items` at `prefix`.
///
/// Items outside `prefix` are dropped. An empty prefix keeps every item.
///
/// # Example
///
/// ```
/// use addonkit::core::changed::strip_item_prefix;
/// use std::path::Path;
///
/// let items = vec!["addons/sale/a.py".to_string(), "setup.py".to_string()];
/// assert_eq!(strip_item_prefix(&items, Path::new("addons")), vec!["sale/a.py"]);
/// ```
pub fn strip_item_prefix(items: &[String], prefix: &Path) -> Vec<String> {
    let prefix: Vec<String> = prefix
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if prefix.is_empty() {
        return items.to_vec();
    }
    let prefix = format!("{}/", prefix.join("/"));
    items
        .iter()
        .filter_map(|item| item.strip_prefix(&prefix))
        .map(str::to_string)
        .collect()
}
