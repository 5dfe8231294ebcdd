//! Error handling utilities
//!
//! This module provides the gateway error types and the circuit breaker used to
//! contain failing downstream services.

pub mod error;
pub mod recovery;

// Re-export commonly used types
pub use error::*;
pub use recovery::*;
