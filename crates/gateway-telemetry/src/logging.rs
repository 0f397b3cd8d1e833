//! Structured logging initialization.
//!
//! Stdout gets pretty output in development and JSON in production
//! (`RUST_ENV=production`); a compact layer always writes to a local log
//! file under the given directory.

use crate::error::{TelemetryError, TelemetryResult};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with stdout and file outputs.
///
/// # Arguments
/// * `log_dir` - Directory for `gateway.log`; created if missing.
pub fn init_logging(log_dir: impl AsRef<Path>) -> TelemetryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gateway=debug"));

    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("gateway.log"))?;

    let file_layer = fmt::layer()
        .compact()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    let result = if is_production {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
