//! Logging setup using `tracing-subscriber`
//!
//! `RUST_LOG` wins when set. Otherwise `-v` raises the level (debug, then
//! trace) and without it the config's `log.level` applies.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity count and configured default level.
pub fn directive(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber, logging to stderr so stdout stays parseable.
pub fn init_logging(verbosity: u8, configured: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbosity, configured)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))
}
