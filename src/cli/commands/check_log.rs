//! check-log command - Scan a server log for test failures

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use crate::cli::Context;
use crate::core::logcheck::{self, LogCheckOptions};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the error records of the log at `file`.
///
/// Exits with status 1 when at least one error is found.
pub fn check_log(
    ctx: &Context,
    file: &Path,
    database: &str,
    odoo_version: Option<&str>,
    check_loaded: bool,
    json: bool,
) -> Result<ExitCode> {
    let path = ctx.resolve(file);
    let reader = BufReader::new(
        File::open(&path).with_context(|| format!("Failed to open log {}", path.display()))?,
    );

    let options = LogCheckOptions {
        database: database.to_string(),
        odoo_version: odoo_version.map(str::to_string),
        check_loaded,
        extra_ignore: ctx.config.log_ignore().to_vec(),
        extra_report: ctx.config.log_report().to_vec(),
    };
    let errors = logcheck::check_log(reader, &options)
        .with_context(|| format!("Failed to check log {}", path.display()))?;

    if json {
        output::result(serde_json::to_string_pretty(&errors)?);
    } else if !errors.is_empty() {
        output::result("-".repeat(10));
        for error in &errors {
            output::result(&error.message);
        }
        output::result("-".repeat(10));
    }

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        output::warn(
            format!("{} error(s) found in {}", errors.len(), path.display()),
            ctx.verbosity(),
        );
        Ok(ExitCode::FAILURE)
    }
}
