//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::client::TokenVerifier;
use crate::core::health::{HealthAggregator, ProcessInfo};
use crate::core::services::{ServiceEnvironment, ServiceName, ServiceRegistry};
use crate::server::routes::proxy::ProxyTable;
use crate::utils::error::{GatewayError, Result};
use crate::utils::net::{HttpClientPoolConfig, create_proxy_client, create_service_client};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every worker. Everything inside is either immutable or
/// `Arc`-shared, so all workers see the same breakers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// One client, and so one breaker, per downstream service
    pub registry: ServiceRegistry,
    pub aggregator: HealthAggregator,
    pub verifier: TokenVerifier,
    /// Prefix table for transparent forwarding
    pub proxy: Arc<ProxyTable>,
    /// Raw client for proxied requests; never goes through a breaker
    pub proxy_client: reqwest::Client,
    pub process: Arc<ProcessInfo>,
}

impl AppState {
    /// Build every shared resource from configuration and an environment snapshot
    pub fn from_config(config: Config, env: &ServiceEnvironment) -> Result<Self> {
        let pool = HttpClientPoolConfig::default();
        let service_http = create_service_client(&pool)?;
        let proxy_client = create_proxy_client(&pool)?;

        let registry = ServiceRegistry::from_config(config.services(), env, service_http);
        let auth = registry
            .get(ServiceName::Auth)
            .ok_or_else(|| GatewayError::Internal("auth-service is not registered".to_string()))?;

        let proxy = ProxyTable::from_registry(&registry);
        let build = crate::build_info();
        let process = ProcessInfo::new(build.version, env.environment(), config.features().clone())
            .with_commit(build.git_hash);

        Ok(Self {
            aggregator: HealthAggregator::new(config.services().health_probe_timeout()),
            verifier: TokenVerifier::new(auth),
            proxy: Arc::new(proxy),
            proxy_client,
            process: Arc::new(process),
            registry,
            config: Arc::new(config),
        })
    }
}
