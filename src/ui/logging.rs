//! ui::logging
//!
//! tracing subscriber setup for the binary.
//!
//! Logs are written to stderr in compact form. `RUST_LOG` takes precedence;
//! otherwise `--debug` enables debug events from this crate and quiet mode
//! keeps only errors.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::output::Verbosity;

/// Default filter directive for a verbosity level.
pub fn default_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "addonkit=warn",
        Verbosity::Debug => "addonkit=debug,info",
    }
}

/// Install the global subscriber. Safe to call once per process; later calls
/// are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
