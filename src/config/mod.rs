//! Configuration management for the Gateway
//!
//! Configuration is read from a YAML file, then selected `GATEWAY_*`
//! environment variables are layered on top. Every section is optional in the
//! file; missing values take their defaults.

pub mod models;

pub use models::*;

use crate::core::services::ServiceEnvironment;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Main configuration struct for the Gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults configuration.
        let gateway: GatewayConfig = if content.trim().is_empty() {
            GatewayConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?
        };

        let config = Self { gateway };
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env(env: &ServiceEnvironment) -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(env)?;
        Ok(config)
    }

    /// Layer `GATEWAY_*` variables over the loaded values and revalidate
    pub fn apply_env_overrides(&mut self, env: &ServiceEnvironment) -> Result<()> {
        if let Some(host) = env.get("GATEWAY_HOST") {
            self.gateway.server.host = host.to_string();
        }
        if let Some(port) = env.get("GATEWAY_PORT") {
            self.gateway.server.port = port.parse().map_err(|_| {
                GatewayError::Config(format!("GATEWAY_PORT is not a valid port: {}", port))
            })?;
        }
        if let Some(level) = env.get("GATEWAY_LOG_LEVEL") {
            self.gateway.logging.level = level.to_string();
        }
        if let Some(json) = env.get("GATEWAY_LOG_JSON") {
            self.gateway.logging.json = parse_bool(json).ok_or_else(|| {
                GatewayError::Config(format!("GATEWAY_LOG_JSON is not a boolean: {}", json))
            })?;
        }

        self.validate()
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    pub fn services(&self) -> &ServicesConfig {
        &self.gateway.services
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.gateway.features
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.gateway.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.gateway
            .services
            .validate()
            .map_err(|e| GatewayError::Config(format!("Services config error: {}", e)))?;

        self.gateway
            .logging
            .validate()
            .map_err(|e| GatewayError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
