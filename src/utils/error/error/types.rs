//! Error types for the Gateway

use super::service::ServiceCallError;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A guarded call to a downstream service failed
    #[error(transparent)]
    Service(#[from] ServiceCallError),

    /// No route or resource matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream could not be reached while proxying
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Upstream did not answer in time while proxying
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// HTTP server lifecycle errors
    #[error("Server error: {0}")]
    Server(String),
}

impl GatewayError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
