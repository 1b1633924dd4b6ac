//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; binaries and tests decide where
//! they go. [`init_tracing`] installs a formatted subscriber filtered by
//! `RUST_LOG`, falling back to the given directive.

use std::sync::Once;

use armory_domain::{ArmoryError, Result};
use tracing_subscriber::EnvFilter;

static TEST_LOGGING: Once = Once::new();

/// Install the global fmt subscriber.
///
/// Returns `Ok(false)` when a global subscriber was already installed, so
/// repeated calls are harmless.
///
/// # Errors
/// Returns `ArmoryError::Config` if `default_directive` is not a valid filter.
pub fn init_tracing(default_directive: &str) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| ArmoryError::Config(format!("Invalid log filter: {e}")))?;

    Ok(tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init().is_ok())
}

/// Route logs through the test writer when `RUST_LOG` is set (once).
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let first = init_tracing("armory=debug");
        assert!(first.is_ok());
        assert!(!init_tracing("armory=debug").unwrap());
    }

    #[test]
    fn test_invalid_directive_is_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let err = init_tracing("armory=loud").unwrap_err();
        assert!(matches!(err, ArmoryError::Config(_)));
    }

    #[test]
    fn test_test_logging_can_be_requested_repeatedly() {
        init_test_logging();
        init_test_logging();
        assert!(TEST_LOGGING.is_completed());
    }
}
