//! cli
//!
//! Command-line interface layer for addonkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and set up logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call into [`crate::core`] and [`crate::git`]. Handlers
//! receive everything they need through [`Context`]; nothing is read from
//! process-wide state after startup.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::{logging, output::Verbosity};

/// Per-invocation execution context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Effective configuration.
    pub config: Config,
}

impl Context {
    /// Directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("Failed to determine working directory"),
        }
    }

    /// Resolve a user-supplied path against `--cwd`.
    ///
    /// Without `--cwd` the path is returned unchanged so output echoes what
    /// the user typed.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    logging::init(Verbosity::from_flags(cli.quiet, cli.debug));

    let mut ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        config: Config::default(),
    };
    ctx.config = Config::load(Some(&ctx.cwd()?)).context("Failed to load configuration")?;

    commands::dispatch(cli.command, &ctx)
}
