//! addonkit - CI helpers for Odoo addon repositories
//!
//! addonkit discovers addon modules, orders addons paths by their declared
//! repository dependencies, resolves transitive module dependencies from
//! manifests, maps git changes onto modules and checks server logs for test
//! failures.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Domain types, manifests, dependency graph and algorithms
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output helpers and logging setup
//!
//! # Guarantees
//!
//! 1. Manifests are parsed as literal data only; no code is executed
//! 2. Orderings are deterministic for a given filesystem state
//! 3. Dependency cycles never cause non-termination

pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
