//! Common test utilities
//!
//! Every helper points service clients at `wiremock` servers through explicit
//! URL overrides, so no test depends on the process environment.

use actix_web::web;
use service_gateway::config::{Config, ServiceOverride, ServicesConfig};
use service_gateway::core::client::{DEFAULT_REQUEST_TIMEOUT, ServiceClient};
use service_gateway::core::services::{ServiceDescriptor, ServiceEnvironment, ServiceName};
use service_gateway::server::state::AppState;
use service_gateway::utils::error::CircuitBreakerConfig;
use std::sync::Arc;
use wiremock::MockServer;

/// An address nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Client for `name` talking to `base_url` with default thresholds
pub fn client_for(name: ServiceName, base_url: &str) -> Arc<ServiceClient> {
    Arc::new(ServiceClient::new(
        ServiceDescriptor::new(name, base_url),
        CircuitBreakerConfig::default(),
        reqwest::Client::new(),
        DEFAULT_REQUEST_TIMEOUT,
    ))
}

/// Services config routing every service to `base_url`
pub fn services_pointing_at(base_url: &str) -> ServicesConfig {
    let mut services = ServicesConfig::default();
    for name in ServiceName::ALL {
        override_url(&mut services, name, base_url);
    }
    services
}

/// Point one service somewhere else
pub fn override_url(services: &mut ServicesConfig, name: ServiceName, base_url: &str) {
    services
        .overrides
        .entry(name)
        .or_insert_with(ServiceOverride::default)
        .url = Some(base_url.to_string());
}

/// Gateway config whose services all live on `server`
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.gateway.services = services_pointing_at(&server.uri());
    config
}

/// Shared state ready for `HttpServer::create_app`
pub fn app_state(config: Config) -> web::Data<AppState> {
    let state = AppState::from_config(config, &ServiceEnvironment::default())
        .expect("state builds from a valid config");
    web::Data::new(state)
}
