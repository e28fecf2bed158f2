//! Wall-clock bound for async operations.
//!
//! # Responsibilities
//! - Race an operation against a timer
//! - Classify overruns as `TimedOut`, distinct from other failures
//! - Honor the cancel-on-timeout policy without blocking the caller
//!
//! # Design Decisions
//! - Built on Tokio's timeout facility
//! - With cancel_on_timeout the overrunning future is dropped; otherwise
//!   it is detached onto the runtime and its result discarded

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::failure::Failure;

/// Bounds the duration of a single async operation.
#[derive(Debug, Clone)]
pub struct TimeLimiter {
    limit: Duration,
    cancel_on_timeout: bool,
}

impl TimeLimiter {
    pub fn new(limit: Duration, cancel_on_timeout: bool) -> Self {
        Self {
            limit,
            cancel_on_timeout,
        }
    }

    /// Run `op`, failing with [`Failure::TimedOut`] if the limit elapses
    /// first.
    ///
    /// Cancellation is best-effort: an operation abandoned on timeout may
    /// still complete in the background, and its outcome is still recorded
    /// by whoever runs it.
    pub async fn run<T, F>(&self, op: F) -> Result<T, Failure>
    where
        F: Future<Output = Result<T, Failure>> + Send + 'static,
        T: Send + 'static,
    {
        if self.cancel_on_timeout {
            match time::timeout(self.limit, op).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(limit = ?self.limit, "Operation cancelled by time limiter");
                    Err(Failure::TimedOut { limit: self.limit })
                }
            }
        } else {
            let mut handle = tokio::spawn(op);
            match time::timeout(self.limit, &mut handle).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => {
                    Err(Failure::Unclassified(format!("operation task failed: {join_error}")))
                }
                Err(_) => {
                    // Dropping the handle detaches the task; it runs to
                    // completion and its result is discarded.
                    tracing::warn!(limit = ?self.limit, "Operation abandoned by time limiter");
                    drop(handle);
                    Err(Failure::TimedOut { limit: self.limit })
                }
            }
        }
    }
}
