//! Tracing subscriber initialisation for weldtrack binaries.
//!
//! Logs go to stderr. The filter is taken from `WELDTRACK_LOG`, then
//! `RUST_LOG`, then falls back to `info`.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Environment variable holding weldtrack-specific filter directives.
pub const LOG_ENV_VAR: &str = "WELDTRACK_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Failure to install the global subscriber.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(#[from] TryInitError);

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_tty)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(build_env_filter(std::env::var(LOG_ENV_VAR).ok()))
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Builds the filter from `WELDTRACK_LOG`, `RUST_LOG`, or the default.
///
/// Unparseable directives fall through to the next source.
fn build_env_filter(directives: Option<String>) -> EnvFilter {
    if let Some(filter) = directives.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
