//! levels command - Show the dependency level of every addons path

use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::Context;
use crate::core::deps::{addons_roots, build_graph, AddonsOptions};
use crate::core::level::{resolve_levels, LevelReport};
use crate::core::order::sorted_by_level;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the level of every node of the repository dependency graph built
/// from the addons roots in `paths`, deepest first.
///
/// Dependencies outside `paths` are marked `(not scanned)` when their
/// directory exists and `(not found)` otherwise.
pub fn levels(ctx: &Context, paths: &[PathBuf], json: bool) -> Result<ExitCode> {
    let options = AddonsOptions {
        dependency_file: ctx.config.dependency_file().to_string(),
    };

    let mut roots = Vec::new();
    for path in paths {
        let resolved = ctx.resolve(path);
        for root in addons_roots(&resolved)
            .with_context(|| format!("Failed to list addons in {}", path.display()))?
        {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
    }

    let graph = build_graph(&roots, &options).context("Failed to read dependencies")?;
    let levels = resolve_levels(&graph);

    if json {
        let report = LevelReport {
            levels: levels.by_key(&graph),
        };
        output::result(serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    for id in sorted_by_level(&graph, &levels) {
        let marker = match (graph.is_virtual(id), graph.key(id).is_dir()) {
            (false, _) => "",
            (true, true) => " (not scanned)",
            (true, false) => " (not found)",
        };
        output::result(format!(
            "{}\t{}{}",
            levels.level(id),
            graph.key(id).display(),
            marker
        ));
    }
    Ok(ExitCode::SUCCESS)
}
