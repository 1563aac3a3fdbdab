//! Logging initialization
//!
//! tracing + tracing-subscriber, written to stderr so page output on stdout
//! stays clean. `RUST_LOG` wins over the configured level.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Installs the global subscriber.
///
/// # Errors
/// Fails if `default_level` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_logging(default_level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| AppError::Logging(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
