//! Telemetry for the perp gateway: structured logging setup.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
