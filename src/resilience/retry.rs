//! Retry executor for the sync call path.
//!
//! # Responsibilities
//! - Re-invoke a guarded operation on retryable failure, up to a bound
//! - Honor the circuit breaker gate on every attempt
//! - Record each attempt's outcome on the breaker
//!
//! # Design Decisions
//! - A breaker rejection fails immediately with `CircuitOpen`; retry
//!   never loops on rejections
//! - Connection errors and 5xx retry; 4xx and malformed bodies do not
//! - Exhaustion is its own failure kind, carrying the last attempt error

use std::future::Future;
use std::sync::Arc;

use crate::failure::{Failure, RemoteFailure};
use crate::resilience::backoff::BackoffStrategy;
use crate::resilience::breaker::{CallOutcome, CircuitBreaker, Permit};

/// Executes a remote operation through the breaker gate with retries.
pub struct RetryExecutor {
    max_attempts: u32,
    backoff: BackoffStrategy,
    breaker: Arc<CircuitBreaker>,
}

impl RetryExecutor {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            max_attempts,
            backoff,
            breaker,
        }
    }

    /// Run `op` until it succeeds, fails terminally, or the attempt
    /// budget runs out.
    ///
    /// The permit is re-checked before every attempt, since the breaker
    /// may have opened from concurrent traffic mid-backoff.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, Failure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteFailure>>,
    {
        let mut attempt = 1u32;
        loop {
            if self.breaker.permit() == Permit::Rejected {
                tracing::debug!(breaker = %self.breaker.name(), attempt, "Call rejected by open circuit");
                return Err(Failure::CircuitOpen);
            }

            match op().await {
                Ok(value) => {
                    self.breaker.record_outcome(CallOutcome::Success);
                    return Ok(value);
                }
                Err(remote) => {
                    self.breaker.record_outcome(CallOutcome::Failure);
                    let failure = Failure::Remote(remote);

                    if !failure.is_retryable() {
                        return Err(failure);
                    }
                    if attempt >= self.max_attempts {
                        return Err(Failure::RetryExhausted {
                            attempts: attempt,
                            last: Box::new(failure),
                        });
                    }

                    let delay = self.backoff.delay_for(attempt);
                    tracing::info!(
                        breaker = %self.breaker.name(),
                        attempt,
                        delay = ?delay,
                        error = %failure,
                        "Retrying inventory call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
