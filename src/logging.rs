//! Tracing subscriber setup for the command-line front end.
//!
//! Filter precedence: `RUST_LOG`, then `-v` flags, then `[logging] filter`
//! from the config file. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Directive used when `RUST_LOG` is unset.
///
/// - 0 (no `-v`): the configured filter
/// - 1 (`-v`): debug for this crate
/// - 2+ (`-vv`): trace for this crate
pub fn filter_directive(config: &LoggingConfig, verbosity: u8) -> String {
    match verbosity {
        0 => config.filter.clone(),
        1 => "perinatal=debug".to_string(),
        _ => "perinatal=trace".to_string(),
    }
}

pub fn init(config: &LoggingConfig, verbosity: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(config, verbosity)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}
