#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! The navigator logs under the `fnav` target through `tracing`; embedders
//! normally install their own subscriber. [`init_json_subscriber`] installs
//! a JSON subscriber honoring `RUST_LOG`, defaulting to `fnav=info`.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "fnav=info";

/// Failure to install the subscriber.
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Install a global JSON subscriber.
///
/// # Errors
///
/// [`LoggingError`] when a global subscriber is already installed.
pub fn init_json_subscriber() -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails() {
        let _ = init_json_subscriber();
        assert!(init_json_subscriber().is_err());
    }
}
