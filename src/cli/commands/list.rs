//! list command - Print addons paths in install order, or module names

use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::args::Cli;
use crate::cli::Context;
use crate::core::closure::parse_list;
use crate::core::deps::{get_addons, AddonsOptions};
use crate::core::manifest::get_modules;
use crate::ui::output;
use anyhow::{Context as _, Result};
use clap::CommandFactory;

/// List addons paths (or module names with `modules`) found in `paths`.
///
/// Entries in `exclude` and in the configured `exclude` list are left out.
/// Without any path, prints usage and exits with status 1.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `paths` - Paths to inspect, in order
/// * `modules` - Print module names instead of addons paths
/// * `exclude` - Comma-separated entries to leave out
pub fn list(
    ctx: &Context,
    paths: &[PathBuf],
    modules: bool,
    exclude: Option<&str>,
) -> Result<ExitCode> {
    if paths.is_empty() {
        let mut cmd = Cli::command();
        if let Some(sub) = cmd.find_subcommand_mut("list") {
            output::result(sub.render_long_help());
        }
        return Ok(ExitCode::FAILURE);
    }

    let options = AddonsOptions {
        dependency_file: ctx.config.dependency_file().to_string(),
    };

    let mut items: Vec<String> = Vec::new();
    for path in paths {
        let resolved = ctx.resolve(path);
        if modules {
            let found = get_modules(&resolved)
                .with_context(|| format!("Failed to list modules in {}", path.display()))?;
            items.extend(found.into_iter().map(String::from));
        } else {
            let found = get_addons(&resolved, &options)
                .with_context(|| format!("Failed to list addons in {}", path.display()))?;
            items.extend(found.iter().map(|p| p.display().to_string()));
        }
    }

    let mut excluded = exclude.map(parse_list).unwrap_or_default();
    excluded.extend(ctx.config.exclude().iter().cloned());
    items.retain(|item| !excluded.contains(item));

    output::result(output::format_comma_list(&items));
    Ok(ExitCode::SUCCESS)
}
