//! Server builder and run_server function

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::core::services::ServiceEnvironment;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    env: Option<ServiceEnvironment>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolve services against this environment instead of the process one
    pub fn with_environment(mut self, env: ServiceEnvironment) -> Self {
        self.env = Some(env);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;
        let env = self.env.unwrap_or_else(ServiceEnvironment::from_process);

        HttpServer::new(&config, &env)
    }
}

/// Load the configuration file and apply environment overrides.
///
/// A missing file at the default location falls back to defaults; a missing
/// file the caller named explicitly is an error.
pub async fn load_config(path: Option<&Path>, env: &ServiceEnvironment) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path).await?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(DEFAULT_CONFIG_PATH).await?
        }
        None => {
            warn!(
                path = DEFAULT_CONFIG_PATH,
                "Configuration file not found, using defaults"
            );
            Config::default()
        }
    };

    config.apply_env_overrides(env)?;
    Ok(config)
}

/// Run the server with an already loaded configuration
pub async fn run_server(config: Config, env: ServiceEnvironment) -> Result<()> {
    info!(version = crate::VERSION, environment = env.environment(), "Starting service gateway");

    let server = ServerBuilder::new()
        .with_config(config)
        .with_environment(env)
        .build()?;

    info!("API Endpoints:");
    info!("   GET  /health - Aggregated downstream health");
    info!("   GET  /health/detailed - Health with process metadata");
    info!("   POST /auth/verify - Token verification");
    for route in server.state().proxy.routes() {
        info!("   *    {} -> {} ({})", route.prefix, route.service, route.base_url);
    }

    server.start().await
}
