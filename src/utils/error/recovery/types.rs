//! Types and configurations for the circuit breaker

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
    /// Circuit is half-open, a single trial request is allowed
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Budget for one guarded call, independent of the request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Failure percentage within the window that opens the circuit
    #[serde(default = "default_error_threshold_pct")]
    pub error_threshold_pct: u32,
    /// Time an open circuit waits before allowing a trial request
    #[serde(default = "default_reset_timeout_ms")]
    pub reset_timeout_ms: u64,
    /// Minimum requests in the window before the failure rate is evaluated
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: u32,
    /// Length of the counting window
    #[serde(default = "default_rolling_window_ms")]
    pub rolling_window_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_error_threshold_pct() -> u32 {
    70
}

fn default_reset_timeout_ms() -> u64 {
    15_000
}

fn default_volume_threshold() -> u32 {
    20
}

fn default_rolling_window_ms() -> u64 {
    10_000
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            error_threshold_pct: default_error_threshold_pct(),
            reset_timeout_ms: default_reset_timeout_ms(),
            volume_threshold: default_volume_threshold(),
            rolling_window_ms: default_rolling_window_ms(),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    pub fn rolling_window(&self) -> Duration {
        Duration::from_millis(self.rolling_window_ms)
    }

    /// Validate breaker thresholds
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Breaker timeout_ms cannot be 0".to_string());
        }
        if !(1..=100).contains(&self.error_threshold_pct) {
            return Err(format!(
                "Breaker error_threshold_pct must be within 1..=100, got {}",
                self.error_threshold_pct
            ));
        }
        if self.volume_threshold == 0 {
            return Err("Breaker volume_threshold cannot be 0".to_string());
        }
        if self.rolling_window_ms == 0 {
            return Err("Breaker rolling_window_ms cannot be 0".to_string());
        }
        Ok(())
    }
}

/// Circuit breaker metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitBreakerMetrics {
    /// Current circuit breaker state
    pub state: CircuitState,
    /// Failures in the current window
    pub failure_count: u32,
    /// Requests in the current window
    pub request_count: u32,
    /// Milliseconds since the last state change
    pub ms_since_state_change: u64,
}

/// Named transition notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakerEvent {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "halfOpen")]
    HalfOpen,
    #[serde(rename = "close")]
    Close,
}

impl BreakerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerEvent::Open => "open",
            BreakerEvent::HalfOpen => "halfOpen",
            BreakerEvent::Close => "close",
        }
    }
}

/// One state change, delivered to observers after the breaker has mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// Service the breaker guards
    pub service: String,
    pub event: BreakerEvent,
    pub from: CircuitState,
    pub to: CircuitState,
    /// Failures counted in the window at the time of the transition
    pub failure_count: u32,
    /// Requests counted in the window at the time of the transition
    pub request_count: u32,
}
