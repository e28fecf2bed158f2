//! Circuit breaker for inventory-service protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: limited trial calls probe recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure rate over the sliding window > threshold
//!                (once at least minimum_number_of_calls are recorded)
//! Open → Half-Open: first permit request after the open wait elapses
//! Half-Open → Closed: all permitted trial calls succeed (window cleared)
//! Half-Open → Open: any trial call fails (fresh open wait)
//! ```
//!
//! # Design Decisions
//! - One breaker per logical dependency, shared by every caller of it
//! - Fail fast in Open state: a rejected permit never reaches the remote
//! - State and window mutate under one mutex, never held across an await
//! - Late outcomes from abandoned calls still land in the window

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// The gate decision made before a call proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Allowed,
    Rejected,
}

/// Outcome of one guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    Failure,
}

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

/// Fixed-capacity ordered buffer of the most recent call outcomes.
#[derive(Debug)]
struct OutcomeWindow {
    outcomes: VecDeque<CallOutcome>,
    capacity: usize,
}

impl OutcomeWindow {
    fn new(capacity: usize) -> Self {
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an outcome, evicting the oldest when at capacity.
    fn push(&mut self, outcome: CallOutcome) {
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    fn len(&self) -> usize {
        self.outcomes.len()
    }

    fn failure_rate(&self) -> f32 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let failures = self
            .outcomes
            .iter()
            .filter(|o| **o == CallOutcome::Failure)
            .count();
        failures as f32 / self.outcomes.len() as f32 * 100.0
    }

    fn clear(&mut self) {
        self.outcomes.clear();
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Closed,
    Open { until: Instant },
    HalfOpen { permits_left: u32, trial_successes: u32 },
}

#[derive(Debug)]
struct Inner {
    state: State,
    window: OutcomeWindow,
}

/// Sliding-window circuit breaker.
///
/// Shared via `Arc` by all concurrent callers of one remote dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let window = OutcomeWindow::new(config.sliding_window_size);
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: State::Closed,
                window,
            }),
        }
    }

    /// Name of the dependency this breaker guards.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decide whether a call may proceed.
    ///
    /// A `Rejected` permit is the fast path: the caller must not invoke
    /// the remote. The first permit requested after the open wait elapses
    /// moves the breaker to half-open and consumes the first trial permit.
    pub fn permit(&self) -> Permit {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            State::Closed => Permit::Allowed,
            State::Open { until } => {
                if Instant::now() >= until {
                    let permits = self.config.permitted_calls_in_half_open_state;
                    inner.state = State::HalfOpen {
                        permits_left: permits.saturating_sub(1),
                        trial_successes: 0,
                    };
                    self.note_transition(BreakerState::HalfOpen);
                    Permit::Allowed
                } else {
                    Permit::Rejected
                }
            }
            State::HalfOpen {
                permits_left,
                trial_successes,
            } => {
                if permits_left > 0 {
                    inner.state = State::HalfOpen {
                        permits_left: permits_left - 1,
                        trial_successes,
                    };
                    Permit::Allowed
                } else {
                    Permit::Rejected
                }
            }
        }
    }

    /// Record the outcome of a granted call.
    ///
    /// Outcomes always land in the window, including stragglers from
    /// abandoned calls that resolve after the breaker already opened, so
    /// the failure-rate view stays accurate.
    pub fn record_outcome(&self, outcome: CallOutcome) {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        inner.window.push(outcome);

        match inner.state {
            State::Closed => {
                if inner.window.len() >= self.config.minimum_number_of_calls {
                    let rate = inner.window.failure_rate();
                    if rate > self.config.failure_rate_threshold {
                        inner.state = State::Open {
                            until: Instant::now() + self.config.wait_duration(),
                        };
                        tracing::warn!(
                            breaker = %self.name,
                            failure_rate = rate,
                            threshold = self.config.failure_rate_threshold,
                            "Circuit breaker opened"
                        );
                        metrics::record_breaker_state(&self.name, BreakerState::Open);
                    }
                }
            }
            State::HalfOpen {
                permits_left,
                trial_successes,
            } => match outcome {
                CallOutcome::Failure => {
                    inner.state = State::Open {
                        until: Instant::now() + self.config.wait_duration(),
                    };
                    tracing::warn!(breaker = %self.name, "Trial call failed, circuit breaker reopened");
                    metrics::record_breaker_state(&self.name, BreakerState::Open);
                }
                CallOutcome::Success => {
                    let successes = trial_successes + 1;
                    if successes >= self.config.permitted_calls_in_half_open_state {
                        inner.state = State::Closed;
                        inner.window.clear();
                        tracing::info!(breaker = %self.name, "All trial calls succeeded, circuit breaker closed");
                        metrics::record_breaker_state(&self.name, BreakerState::Closed);
                    } else {
                        inner.state = State::HalfOpen {
                            permits_left,
                            trial_successes: successes,
                        };
                    }
                }
            },
            // A late outcome cannot move an open breaker; the window
            // update above is all that matters.
            State::Open { .. } => {}
        }
    }

    /// Current externally visible state.
    pub fn state(&self) -> BreakerState {
        let inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            State::Closed => BreakerState::Closed,
            State::Open { .. } => BreakerState::Open,
            State::HalfOpen { .. } => BreakerState::HalfOpen,
        }
    }

    /// Number of outcomes currently recorded in the window.
    pub fn recorded_calls(&self) -> usize {
        self.inner.lock().expect("breaker mutex poisoned").window.len()
    }

    fn note_transition(&self, to: BreakerState) {
        tracing::info!(breaker = %self.name, state = to.as_str(), "Circuit breaker state change");
        metrics::record_breaker_state(&self.name, to);
    }
}
