//! Error recovery and resilience utilities
//!
//! This module provides the per-service circuit breaker and its transition observers.

mod circuit_breaker;
mod observer;
mod types;

pub use circuit_breaker::CircuitBreaker;
pub use observer::{BreakerObserver, LoggingObserver, TransitionLog};
pub use types::{
    BreakerEvent, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState, StateTransition,
};
