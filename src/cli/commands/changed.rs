//! changed command - List modules changed since a base revision

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::Context;
use crate::core::changed::{modules_changed, strip_item_prefix};
use crate::git::Git;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the modules under `path` touched between `base` and `target`.
///
/// `path` may be the repository root or an addons directory inside it.
pub fn changed(
    ctx: &Context,
    path: Option<&Path>,
    base: &str,
    target: Option<&str>,
) -> Result<ExitCode> {
    let root: PathBuf = match path {
        Some(path) => ctx.resolve(path),
        None => ctx.cwd()?,
    };

    let git = Git::open(&root).context("Failed to open repository")?;
    let work_dir = git
        .work_dir()?
        .canonicalize()
        .context("Failed to resolve repository root")?;
    let canonical_root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    let prefix = canonical_root
        .strip_prefix(&work_dir)
        .unwrap_or(Path::new(""));

    let items = git
        .items_changed(base, target)
        .with_context(|| format!("Failed to diff {}..{}", base, target.unwrap_or("HEAD")))?;
    let items = strip_item_prefix(&items, prefix);

    let modules = modules_changed(&root, &items).context("Failed to list modules")?;
    output::result(output::format_comma_list(&modules));
    Ok(ExitCode::SUCCESS)
}
