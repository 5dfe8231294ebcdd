//! Shared HTTP clients for downstream calls
//!
//! One pooled client is built at startup and cloned into every service client
//! and the proxy. Cloning a `reqwest::Client` shares its connection pool, so
//! all calls to the same downstream reuse keep-alive connections.
//!
//! Neither client sets a whole-request timeout. Each call carries its own,
//! because the service client and the proxy apply different budgets.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client pool
#[derive(Debug, Clone)]
pub struct HttpClientPoolConfig {
    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout
    pub pool_idle_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// TCP keepalive interval
    pub tcp_keepalive: Duration,
    /// User agent string
    pub user_agent: &'static str,
}

impl Default for HttpClientPoolConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(5),
            tcp_keepalive: Duration::from_secs(60),
            user_agent: concat!("service-gateway/", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn pooled_builder(config: &HttpClientPoolConfig) -> ClientBuilder {
    ClientBuilder::new()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout)
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(config.tcp_keepalive)
        .tcp_nodelay(true)
        .user_agent(config.user_agent)
}

/// Client used by service clients for JSON calls
pub fn create_service_client(config: &HttpClientPoolConfig) -> Result<Client, reqwest::Error> {
    debug!(
        pool_max_idle_per_host = config.pool_max_idle_per_host,
        "Creating service HTTP client"
    );
    pooled_builder(config).build()
}

/// Client used by the reverse proxy.
///
/// Redirects are passed back to the caller untouched rather than followed.
pub fn create_proxy_client(config: &HttpClientPoolConfig) -> Result<Client, reqwest::Error> {
    debug!("Creating proxy HTTP client");
    pooled_builder(config)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
