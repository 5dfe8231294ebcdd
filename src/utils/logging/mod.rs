//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when it is set, so operators can
//! raise verbosity for a single module without touching the config file.

use crate::config::LoggingConfig;
use crate::utils::error::{GatewayError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| GatewayError::config(format!("Invalid log level '{}': {}", config.level, e))),
    }
}

/// Scoped subscriber for events raised while the configuration is still being
/// loaded, before the global one exists. Honors `RUST_LOG`, else `info`.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish()
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed, which only happens when the
/// gateway is embedded in another program that configured tracing itself.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| GatewayError::config(format!("Failed to install tracing subscriber: {}", e)))
}
