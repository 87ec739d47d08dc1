//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves paths against the execution context
//! 2. Calls into `core` (or `git`) to compute the result
//! 3. Formats and prints output
//!
//! Handlers return the process exit code for outcomes that are not errors
//! but must still fail a CI step (e.g. errors found in a log).

mod changed;
mod check_log;
mod completion;
mod config_cmd;
mod depends;
mod levels;
mod list;

// Re-export command functions for testing and direct invocation
pub use changed::changed;
pub use check_log::check_log;
pub use completion::completion;
pub use config_cmd::show as config_show;
pub use depends::depends;
pub use levels::levels;
pub use list::list;

use std::process::ExitCode;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::List {
            modules,
            exclude,
            paths,
        } => list::list(ctx, &paths, modules, exclude.as_deref()),
        Command::Levels { json, paths } => levels::levels(ctx, &paths, json),
        Command::Depends {
            addons_path,
            test,
            modules,
        } => depends::depends(ctx, &addons_path, &modules, test),
        Command::Changed { path, base, target } => {
            changed::changed(ctx, path.as_deref(), &base, target.as_deref())
        }
        Command::CheckLog {
            file,
            database,
            odoo_version,
            no_check_loaded,
            json,
        } => check_log::check_log(
            ctx,
            &file,
            &database,
            odoo_version.as_deref(),
            !no_check_loaded,
            json,
        ),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}
