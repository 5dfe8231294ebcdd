//! Transition observers for the circuit breaker

use super::types::{BreakerEvent, StateTransition};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Receives breaker transitions. Notifications only; cannot veto a transition.
pub trait BreakerObserver: Send + Sync {
    fn on_transition(&self, transition: &StateTransition);
}

/// Logs every transition through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl BreakerObserver for LoggingObserver {
    fn on_transition(&self, transition: &StateTransition) {
        match transition.event {
            BreakerEvent::Open => warn!(
                service = %transition.service,
                event = transition.event.as_str(),
                from = %transition.from,
                failure_count = transition.failure_count,
                request_count = transition.request_count,
                "Circuit breaker opened"
            ),
            BreakerEvent::HalfOpen => info!(
                service = %transition.service,
                event = transition.event.as_str(),
                "Circuit breaker half-open, allowing trial request"
            ),
            BreakerEvent::Close => info!(
                service = %transition.service,
                event = transition.event.as_str(),
                "Circuit breaker closed after successful trial"
            ),
        }
    }
}

/// Keeps every transition in memory, in order
#[derive(Debug, Default)]
pub struct TransitionLog {
    entries: Mutex<Vec<StateTransition>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded transitions
    pub fn entries(&self) -> Vec<StateTransition> {
        self.entries.lock().clone()
    }

    /// Recorded event names, oldest first
    pub fn events(&self) -> Vec<BreakerEvent> {
        self.entries.lock().iter().map(|t| t.event).collect()
    }
}

impl BreakerObserver for TransitionLog {
    fn on_transition(&self, transition: &StateTransition) {
        self.entries.lock().push(transition.clone());
    }
}
