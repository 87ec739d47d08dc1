//! depends command - Resolve transitive manifest dependencies

use std::path::Path;
use std::process::ExitCode;

use crate::cli::Context;
use crate::core::closure::{collect, parse_list, test_dependencies, SearchPath};
use crate::ui::output;
use anyhow::Result;

/// Print the transitive dependencies of `modules`, or with `test` the
/// modules to preinstall before testing them.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `addons_path` - Comma-separated addons directories, searched in order
/// * `modules` - Module names; each argument may itself be a comma list
/// * `test` - Print preinstall dependencies instead of the closure
pub fn depends(ctx: &Context, addons_path: &str, modules: &[String], test: bool) -> Result<ExitCode> {
    let paths = SearchPath::new(
        parse_list(addons_path)
            .into_iter()
            .map(|dir| ctx.resolve(Path::new(&dir))),
    );
    let modules: Vec<String> = modules.iter().flat_map(|m| parse_list(m)).collect();

    let result = if test {
        test_dependencies(&paths, &modules)?
    } else {
        collect(&paths, modules)?
    };

    let result: Vec<String> = result.into_iter().collect();
    output::result(output::format_comma_list(&result));
    Ok(ExitCode::SUCCESS)
}
