//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// addonkit - discover, order and resolve Odoo addon modules for CI
#[derive(Parser, Debug)]
#[command(name = "addonkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if addonkit was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List addons paths in install order, or module names
    #[command(
        name = "list",
        long_about = "Given a list of paths, find and print the valid addons paths.\n\n\
            A path that directly contains installable modules is an addons path; \
            otherwise each of its immediate subdirectories that does is one. \
            Repositories named in a path's oca_dependencies.txt are included as \
            sibling paths, and the result is ordered so that repositories come \
            before the repositories they depend on.\n\n\
            With -m, print the installable module names found in each path instead.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Build an addons path for the server
    addonkit list ~/dependencies

    # List the modules to test, leaving some out
    addonkit list -m -e website_demo,l10n_demo .

OUTPUT:
    A single comma-separated line, suitable for --addons-path or -i."
    )]
    List {
        /// Print module names instead of addons paths
        #[arg(short = 'm', long = "modules")]
        modules: bool,

        /// Comma-separated entries to leave out of the output
        #[arg(short = 'e', long = "exclude", value_name = "LIST")]
        exclude: Option<String>,

        /// Paths to inspect
        paths: Vec<PathBuf>,
    },

    /// Show the dependency level of every addons path
    #[command(
        name = "levels",
        long_about = "Show how deep the repository dependency chain below each addons \
            path goes. Paths without declared dependencies have level 0."
    )]
    Levels {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,

        /// Paths to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Resolve the transitive manifest dependencies of modules
    #[command(
        name = "depends",
        long_about = "Resolve every module the given modules depend on, directly or \
            indirectly, by reading their manifests' 'depends' keys.\n\n\
            Modules are looked up in the addons path directories in order. A \
            requested module that cannot be found is an error; a dependency that \
            cannot be found is skipped.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Everything needed to install sale_stock
    addonkit depends --addons-path /odoo/addons,. sale_stock

    # Modules to preinstall before testing the repository's modules
    addonkit depends --test --addons-path /odoo/addons,. $(addonkit list -m .)"
    )]
    Depends {
        /// Comma-separated addons directories, searched in order
        #[arg(long, value_name = "PATHS")]
        addons_path: String,

        /// Print the direct dependencies to preinstall for testing the modules
        #[arg(long)]
        test: bool,

        /// Module names (comma-separated lists are accepted)
        #[arg(required_unless_present = "test")]
        modules: Vec<String>,
    },

    /// List modules changed since a base revision
    #[command(
        name = "changed",
        long_about = "List the installable modules touched by the changes between a base \
            revision and a target revision (HEAD by default)."
    )]
    Changed {
        /// Addons path inside a git repository (defaults to the working directory)
        path: Option<PathBuf>,

        /// Base revision, e.g. origin/16.0
        #[arg(long)]
        base: String,

        /// Target revision (defaults to HEAD)
        #[arg(long)]
        target: Option<String>,
    },

    /// Check a server log for test failures
    #[command(
        name = "check-log",
        long_about = "Scan an Odoo server log for test failures and errors.\n\n\
            Exits with status 1 when any error is found.",
        after_help = "\
WORKFLOW EXAMPLES:
    addonkit check-log stdout.log --database openerp_test --odoo-version 8.0"
    )]
    CheckLog {
        /// Log file to scan
        file: PathBuf,

        /// Database name the tests ran against
        #[arg(long)]
        database: String,

        /// Odoo series (e.g. 8.0); before 7.0 every ERROR line fails
        #[arg(long)]
        odoo_version: Option<String>,

        /// Do not require the "Modules loaded." message
        #[arg(long)]
        no_check_loaded: bool,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_accepts_short_flags() {
        let cli = Cli::try_parse_from(["addonkit", "list", "-m", "-e", "a,b", "x", "y"]).unwrap();
        match cli.command {
            Command::List {
                modules,
                exclude,
                paths,
            } => {
                assert!(modules);
                assert_eq!(exclude.as_deref(), Some("a,b"));
                assert_eq!(paths, vec![PathBuf::from("x"), PathBuf::from("y")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_without_paths_parses() {
        let cli = Cli::try_parse_from(["addonkit", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List { ref paths, .. } if paths.is_empty()));
    }

    #[test]
    fn depends_requires_modules_unless_test() {
        assert!(Cli::try_parse_from(["addonkit", "depends", "--addons-path", "a"]).is_err());
        assert!(
            Cli::try_parse_from(["addonkit", "depends", "--addons-path", "a", "--test"]).is_ok()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["addonkit", "levels", "x", "--debug", "-q"]).unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
    }
}
