//! config command - Show the effective configuration

use std::process::ExitCode;

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the effective configuration as TOML.
///
/// Contributing files are listed as comments above the values.
pub fn show(ctx: &Context) -> Result<ExitCode> {
    let config = &ctx.config;

    if config.sources.is_empty() {
        output::result("# no configuration files found, using defaults");
    } else {
        let sources: Vec<_> = config.sources.iter().map(|s| s.display()).collect();
        output::result(output::format_list(&sources, "# from "));
    }

    let rendered = config.to_toml().context("Failed to render configuration")?;
    output::result(rendered.trim_end());

    Ok(ExitCode::SUCCESS)
}
