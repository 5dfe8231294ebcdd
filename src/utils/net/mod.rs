//! Network utilities

pub mod http;

pub use http::{HttpClientPoolConfig, create_proxy_client, create_service_client};
