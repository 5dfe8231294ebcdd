//! Utility modules for the service gateway
//!
//! - **error**: Error types and the circuit breaker
//! - **logging**: Tracing subscriber setup
//! - **net**: Shared HTTP clients

pub mod error;
pub mod logging;
pub mod net;

use uuid::Uuid;

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

