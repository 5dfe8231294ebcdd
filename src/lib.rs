//! # service-gateway
//!
//! API gateway core for a set of independently deployed HTTP services.
//!
//! ## Features
//!
//! - **Guarded service clients**: every internal call to a downstream goes
//!   through that service's own circuit breaker
//! - **Environment-aware resolution**: cluster DNS in production, overridable
//!   localhost addresses everywhere else
//! - **Aggregated health**: concurrent settle-all probing of every downstream
//! - **Reverse proxy**: static path-prefix routing to the resolved addresses
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use service_gateway::{Config, Gateway};
//! use service_gateway::core::services::ServiceEnvironment;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config, ServiceEnvironment::from_process())?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::client::{RequestOptions, ServiceClient, TokenVerifier};
pub use core::health::{AggregateHealth, HealthAggregator};
pub use core::services::{ServiceEnvironment, ServiceName, ServiceRegistry};
pub use utils::error::{CircuitBreaker, CircuitBreakerConfig, GatewayError, Result, ServiceCallError};

use tracing::{debug, info};

/// A configured gateway ready to serve
pub struct Gateway {
    config: Config,
    server: server::server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config, env: ServiceEnvironment) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::builder::ServerBuilder::new()
            .with_config(config.clone())
            .with_environment(env)
            .build()?;

        Ok(Self { config, server })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting service gateway");
        debug!("Configuration: {:#?}", self.config);

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix timestamp of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build metadata embedded at compile time
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
