//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber configured from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::LoggingConfig;
use crate::error::constants::ERR_LOGGING_INIT;
use crate::error::{ProtocolError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns an error if a different global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ProtocolError::LoggingError(format!("{ERR_LOGGING_INIT}: {e}")))?;

    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}

/// Like [`init_logging`], but a subscriber that is already installed is not an error.
pub fn try_init_logging(config: &LoggingConfig) {
    if init_logging(config).is_err() {
        tracing::debug!("Global subscriber already installed; keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let config = LoggingConfig::default();
        try_init_logging(&config);
        try_init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
