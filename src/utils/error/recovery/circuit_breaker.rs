//! Circuit breaker implementation for fault tolerance
//!
//! One breaker guards one downstream service. While closed it counts attempts
//! and failures in a sliding window split into buckets, so history expires one
//! slice at a time. While open it rejects every call, and once the reset
//! timeout has elapsed it lets a single trial call through.

use super::observer::BreakerObserver;
use super::types::{
    BreakerEvent, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState, StateTransition,
};
use crate::utils::error::ServiceCallError;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Number of buckets the rolling window is divided into
const WINDOW_BUCKETS: u64 = 10;

/// Attempts and failures that completed within one slice of the window
#[derive(Debug, Clone, Copy)]
struct WindowBucket {
    index: u64,
    requests: u32,
    failures: u32,
}

/// Mutable breaker state. Guarded by a mutex private to one breaker and never
/// held across an await point.
#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    /// Oldest bucket first
    buckets: VecDeque<WindowBucket>,
    last_state_change: Instant,
    trial_in_flight: bool,
}

impl BreakerInner {
    fn new(now: Instant) -> Self {
        Self {
            state: CircuitState::Closed,
            buckets: VecDeque::with_capacity(WINDOW_BUCKETS as usize),
            last_state_change: now,
            trial_in_flight: false,
        }
    }

    /// Drop buckets that no longer overlap the window ending at `current`
    fn evict(&mut self, current: u64) {
        while self
            .buckets
            .front()
            .is_some_and(|b| b.index + WINDOW_BUCKETS <= current)
        {
            self.buckets.pop_front();
        }
    }

    fn record(&mut self, current: u64, failed: bool) {
        self.evict(current);
        if self.buckets.back().map(|b| b.index) != Some(current) {
            self.buckets.push_back(WindowBucket {
                index: current,
                requests: 0,
                failures: 0,
            });
        }
        if let Some(bucket) = self.buckets.back_mut() {
            bucket.requests += 1;
            if failed {
                bucket.failures += 1;
            }
        }
    }

    /// `(requests, failures)` summed over the buckets live at `current`
    fn totals(&self, current: u64) -> (u32, u32) {
        self.buckets
            .iter()
            .filter(|b| b.index + WINDOW_BUCKETS > current)
            .fold((0, 0), |(r, f), b| (r + b.requests, f + b.failures))
    }
}

/// Circuit breaker implementation
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    /// Origin of the bucket numbering
    epoch: Instant,
    inner: Mutex<BreakerInner>,
    observers: RwLock<Vec<Arc<dyn BreakerObserver>>>,
}

/// Releases a half-open trial slot if the guarded call is dropped before it
/// completes, so a cancelled trial cannot wedge the breaker.
struct TrialSlot<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.inner.lock().trial_in_flight = false;
        }
    }
}

impl CircuitBreaker {
    /// Create a new circuit breaker for the named service
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let now = Instant::now();
        Self {
            name: name.into(),
            config,
            epoch: now,
            inner: Mutex::new(BreakerInner::new(now)),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer for `open`, `halfOpen` and `close` transitions
    pub fn subscribe(&self, observer: Arc<dyn BreakerObserver>) {
        self.observers.write().push(observer);
    }

    /// Execute an operation with circuit breaker protection.
    ///
    /// The operation is only constructed when the breaker admits the call, so
    /// an open circuit performs no I/O at all. The breaker's own timeout runs
    /// alongside whatever timeout the operation applies internally.
    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T, ServiceCallError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceCallError>>,
    {
        let trial = self.try_acquire()?;
        let mut slot = TrialSlot {
            breaker: self,
            armed: trial,
        };

        let outcome = match tokio::time::timeout(self.config.timeout(), operation()).await {
            Ok(result) => result,
            Err(_) => {
                debug!(service = %self.name, timeout_ms = self.config.timeout_ms, "Breaker timeout fired");
                Err(ServiceCallError::timeout(&self.name, self.config.timeout()))
            }
        };

        slot.armed = false;
        match &outcome {
            Ok(_) => self.on_success(trial),
            Err(error) if error.counts_as_failure() => self.on_failure(trial),
            Err(_) => self.release_trial(trial),
        }

        outcome
    }

    /// Decide whether a call may proceed. Returns whether it is the half-open trial.
    fn try_acquire(&self) -> Result<bool, ServiceCallError> {
        let (admitted, transition) = {
            let mut inner = self.inner.lock();
            let state = inner.state;
            match state {
                CircuitState::Closed => (Ok(false), None),
                CircuitState::Open => {
                    let now = Instant::now();
                    if now.duration_since(inner.last_state_change) >= self.config.reset_timeout() {
                        inner.state = CircuitState::HalfOpen;
                        inner.last_state_change = now;
                        inner.trial_in_flight = true;
                        let transition = self.transition(
                            &inner,
                            BreakerEvent::HalfOpen,
                            CircuitState::Open,
                        );
                        (Ok(true), Some(transition))
                    } else {
                        (Err(ServiceCallError::circuit_open(&self.name)), None)
                    }
                }
                CircuitState::HalfOpen => {
                    if inner.trial_in_flight {
                        (Err(ServiceCallError::circuit_open(&self.name)), None)
                    } else {
                        inner.trial_in_flight = true;
                        (Ok(true), None)
                    }
                }
            }
        };

        if let Some(transition) = transition {
            self.notify(&transition);
        }
        admitted
    }

    /// Handle successful request
    fn on_success(&self, trial: bool) {
        let transition = {
            let mut inner = self.inner.lock();
            let now = Instant::now();

            if trial {
                inner.trial_in_flight = false;
                if inner.state != CircuitState::HalfOpen {
                    return;
                }
                inner.buckets.clear();
                inner.state = CircuitState::Closed;
                inner.last_state_change = now;
                Some(self.transition(&inner, BreakerEvent::Close, CircuitState::HalfOpen))
            } else if inner.state == CircuitState::Closed {
                inner.record(self.bucket_index(now), false);
                self.evaluate(&mut inner, now)
            } else {
                // Admitted while closed, completed after the circuit changed.
                None
            }
        };

        if let Some(transition) = transition {
            self.notify(&transition);
        }
    }

    /// Handle failed request
    fn on_failure(&self, trial: bool) {
        let transition = {
            let mut inner = self.inner.lock();
            let now = Instant::now();

            if trial {
                inner.trial_in_flight = false;
                if inner.state != CircuitState::HalfOpen {
                    return;
                }
                inner.state = CircuitState::Open;
                inner.last_state_change = now;
                Some(self.transition(&inner, BreakerEvent::Open, CircuitState::HalfOpen))
            } else if inner.state == CircuitState::Closed {
                inner.record(self.bucket_index(now), true);
                self.evaluate(&mut inner, now)
            } else {
                None
            }
        };

        if let Some(transition) = transition {
            self.notify(&transition);
        }
    }

    fn release_trial(&self, trial: bool) {
        if trial {
            self.inner.lock().trial_in_flight = false;
        }
    }

    fn bucket_width(&self) -> Duration {
        (self.config.rolling_window() / WINDOW_BUCKETS as u32).max(Duration::from_millis(1))
    }

    /// Window slice that `now` falls into
    fn bucket_index(&self, now: Instant) -> u64 {
        let elapsed = now.duration_since(self.epoch).as_nanos();
        (elapsed / self.bucket_width().as_nanos()) as u64
    }

    /// Open the circuit when the window holds enough requests and enough failures
    fn evaluate(&self, inner: &mut BreakerInner, now: Instant) -> Option<StateTransition> {
        let (requests, failures) = inner.totals(self.bucket_index(now));
        if requests < self.config.volume_threshold {
            return None;
        }

        let failure_pct = u64::from(failures) * 100;
        let threshold = u64::from(self.config.error_threshold_pct) * u64::from(requests);
        if failure_pct < threshold {
            return None;
        }

        inner.state = CircuitState::Open;
        inner.last_state_change = now;
        Some(self.transition(inner, BreakerEvent::Open, CircuitState::Closed))
    }

    fn transition(
        &self,
        inner: &BreakerInner,
        event: BreakerEvent,
        from: CircuitState,
    ) -> StateTransition {
        let (request_count, failure_count) = inner.totals(self.bucket_index(Instant::now()));
        StateTransition {
            service: self.name.clone(),
            event,
            from,
            to: inner.state,
            failure_count,
            request_count,
        }
    }

    fn notify(&self, transition: &StateTransition) {
        for observer in self.observers.read().iter() {
            observer.on_transition(transition);
        }
    }

    /// Get current circuit breaker state
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Get current metrics
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.inner.lock();
        let now = Instant::now();
        let (request_count, failure_count) = inner.totals(self.bucket_index(now));
        CircuitBreakerMetrics {
            state: inner.state,
            failure_count,
            request_count,
            ms_since_state_change: now
                .duration_since(inner.last_state_change)
                .as_millis() as u64,
        }
    }

    /// Name of the guarded service
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Reset the circuit breaker to a fresh closed state
    pub fn reset(&self) {
        *self.inner.lock() = BreakerInner::new(Instant::now());
        debug!(service = %self.name, "Circuit breaker reset");
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}
