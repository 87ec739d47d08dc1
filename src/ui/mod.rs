//! ui
//!
//! User-facing output and logging setup.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`logging`] - tracing subscriber initialisation
//!
//! # Design
//!
//! Command results go to stdout so they can be captured by CI scripts.
//! Diagnostics (warnings, errors, logs) go to stderr.

pub mod logging;
pub mod output;
