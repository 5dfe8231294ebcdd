//! Error handling for the Gateway
//!
//! This module defines all error types used throughout the gateway.

mod response;
mod service;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use service::ServiceCallError;
pub use types::{GatewayError, Result};
