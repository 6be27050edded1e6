//! Brings the `weld_details` table up to the current layout.
//!
//! Usage:
//!
//! ```text
//! weldtrack-schema [config-path]
//! ```
//!
//! Without an argument the configuration is resolved from `WELDTRACK_CONFIG`
//! or `weldtrack.toml`. Every applied step and every skipped constraint is
//! logged to stderr. Running the command twice is harmless.

use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};
use weldtrack::config::{ConfigError, WeldtrackConfig};
use weldtrack::telemetry::{TelemetryError, init_tracing};
use weldtrack::weld_job::adapters::postgres::PostgresWeldJobRepository;
use weldtrack::weld_job::ports::{SchemaGuardError, WeldJobSchema};

#[derive(Debug, Error)]
enum SchemaCommandError {
    #[error("too many arguments; expected at most a config path")]
    InvalidArgs,
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Schema(#[from] SchemaGuardError),
}

fn main() -> Result<(), SchemaCommandError> {
    init_tracing()?;
    let config_path = parse_args(env::args_os().skip(1).map(PathBuf::from))?;
    let config = WeldtrackConfig::load(config_path.as_deref())?;
    let repository = PostgresWeldJobRepository::new(config.database.url);

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let report = runtime.block_on(repository.ensure_schema())?;

    for step in &report.applied {
        info!(step = %step, "schema step applied");
    }
    for warning in &report.warnings {
        warn!(step = %warning.step, reason = %warning.reason, "schema step skipped");
    }
    info!(
        applied = report.applied.len(),
        skipped = report.warnings.len(),
        "weld_details schema is current"
    );
    Ok(())
}

fn parse_args(
    mut args: impl Iterator<Item = PathBuf>,
) -> Result<Option<PathBuf>, SchemaCommandError> {
    let config_path = args.next();
    if args.next().is_some() {
        return Err(SchemaCommandError::InvalidArgs);
    }
    Ok(config_path)
}
