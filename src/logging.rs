//! Log sink setup for the command-line tool.

use crate::error::{Result, ScrubError};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set: progress and skip messages are
/// `debug`, so they only show up with `--verbose`.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| ScrubError::Config(format!("could not install log subscriber: {e}")))
}
