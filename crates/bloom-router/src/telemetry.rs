//! Tracing setup for binaries and tests embedding the router.
//!
//! The router itself only emits `tracing` events; installing a subscriber is
//! left to the application. This helper installs a fmt subscriber filtered by
//! `RUST_LOG`, falling back to the given level.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing initialisation errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),
}

/// Install a global fmt subscriber.
pub fn init_tracing(default_level: &str) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::TracerInit(e.to_string()))?;

    tracing::debug!(level = default_level, "[bloom-router] Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_cleanly() {
        let _ = init_tracing("debug");
        let second = init_tracing("debug");
        assert!(matches!(second, Err(TelemetryError::TracerInit(_))));
    }
}
