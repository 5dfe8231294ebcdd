//! Errors raised by guarded service-to-service calls

use std::time::Duration;
use thiserror::Error;

/// Outcome of a failed call made through a `ServiceClient`.
///
/// `Network` and `Http` are observations of the downstream and count toward the
/// breaker's failure tally. `CircuitOpen` is produced by the breaker itself
/// without any I/O and is never counted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceCallError {
    /// No response was received: connect, DNS or timeout failure
    #[error("Network error calling {service}: {message}")]
    Network {
        service: String,
        message: String,
        timed_out: bool,
    },

    /// A response was received with a non-2xx status
    #[error("{service} responded with status {status}: {message}")]
    Http {
        service: String,
        status: u16,
        message: String,
    },

    /// The breaker rejected the call without contacting the service
    #[error("Circuit breaker for {service} is open")]
    CircuitOpen { service: String },
}

impl ServiceCallError {
    pub fn network(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            service: service.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(service: impl Into<String>, after: Duration) -> Self {
        Self::Network {
            service: service.into(),
            message: format!("timed out after {}ms", after.as_millis()),
            timed_out: true,
        }
    }

    pub fn http(service: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    pub fn circuit_open(service: impl Into<String>) -> Self {
        Self::CircuitOpen {
            service: service.into(),
        }
    }

    /// Name of the downstream service the call targeted
    pub fn service(&self) -> &str {
        match self {
            Self::Network { service, .. }
            | Self::Http { service, .. }
            | Self::CircuitOpen { service } => service,
        }
    }

    /// Whether this outcome is a new data point for the breaker
    pub fn counts_as_failure(&self) -> bool {
        !matches!(self, Self::CircuitOpen { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { timed_out: true, .. })
    }

    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Upstream HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
