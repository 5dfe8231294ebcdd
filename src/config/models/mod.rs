//! Configuration data models

pub mod features;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod services;

pub use features::*;
pub use gateway::*;
pub use logging::*;
pub use server::*;
pub use services::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default budget for one proxied request
pub fn default_proxy_timeout_ms() -> u64 {
    30_000
}

/// Default maximum proxied body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_request_timeout_ms() -> u64 {
    15_000
}

pub fn default_health_probe_timeout_ms() -> u64 {
    5_000
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
