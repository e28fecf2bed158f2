//! Asynchronous call path.
//!
//! Composition order: the time limiter bounds a single breaker-guarded
//! attempt dispatched on the worker pool. No retries here; rejection,
//! timeout, and remote errors all resolve through the fallback chain.

use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::pipeline::worker::WorkerPool;
use crate::resilience::{FallbackResolver, TimeLimiter};

/// Timeout-then-fallback pipeline for `GET .../async`.
pub struct AsyncPipeline {
    pool: Arc<WorkerPool>,
    limiter: TimeLimiter,
    fallback: Arc<FallbackResolver>,
}

impl AsyncPipeline {
    pub fn new(pool: Arc<WorkerPool>, limiter: TimeLimiter, fallback: Arc<FallbackResolver>) -> Self {
        Self {
            pool,
            limiter,
            fallback,
        }
    }

    /// Check stock for a product through the worker pool. Always produces
    /// a response body; this boundary never raises.
    pub async fn call(&self, product_id: &str) -> String {
        let started = Instant::now();
        let pool = self.pool.clone();
        let id = product_id.to_string();

        let result = self.limiter.run(async move { pool.submit(&id).await }).await;

        match result {
            Ok(body) => {
                metrics::record_call("async", "success", started);
                body
            }
            Err(failure) => {
                tracing::warn!(
                    product_id = %product_id,
                    error = %failure,
                    "Async inventory call failed, resolving fallback"
                );
                metrics::record_call("async", failure.kind().as_str(), started);
                self.fallback.resolve(product_id, &failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::config::CircuitBreakerConfig;
    use crate::failure::RemoteFailure;
    use crate::remote::InventoryCall;
    use crate::resilience::breaker::CallOutcome;
    use crate::resilience::fallback::{CIRCUIT_OPEN_FALLBACK, TIMED_OUT_FALLBACK};
    use crate::resilience::CircuitBreaker;

    struct SlowRemote {
        calls: AtomicU32,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl InventoryCall for SlowRemote {
        async fn fetch_stock(&self, product_id: &str) -> Result<String, RemoteFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(format!("In stock: {product_id}"))
        }
    }

    fn pipeline_with(
        remote: Arc<SlowRemote>,
        breaker: Arc<CircuitBreaker>,
        limit: Duration,
    ) -> AsyncPipeline {
        let pool = Arc::new(WorkerPool::new(2, 8, remote, breaker));
        AsyncPipeline::new(
            pool,
            TimeLimiter::new(limit, true),
            Arc::new(FallbackResolver::standard()),
        )
    }

    fn closed_breaker() -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new("inv", CircuitBreakerConfig::default()))
    }

    #[tokio::test]
    async fn fast_remote_passes_through() {
        let remote = Arc::new(SlowRemote {
            calls: AtomicU32::new(0),
            delay: Duration::from_millis(1),
        });
        let pipeline = pipeline_with(remote, closed_breaker(), Duration::from_millis(500));

        assert_eq!(pipeline.call("p1").await, "In stock: p1");
    }

    #[tokio::test]
    async fn overrun_yields_the_timeout_fallback_not_others() {
        let remote = Arc::new(SlowRemote {
            calls: AtomicU32::new(0),
            delay: Duration::from_millis(200),
        });
        let pipeline = pipeline_with(remote, closed_breaker(), Duration::from_millis(20));

        let body = pipeline.call("p1").await;
        assert_eq!(body, TIMED_OUT_FALLBACK);
        assert_ne!(body, CIRCUIT_OPEN_FALLBACK);
    }

    #[tokio::test]
    async fn open_breaker_yields_the_circuit_open_fallback() {
        let remote = Arc::new(SlowRemote {
            calls: AtomicU32::new(0),
            delay: Duration::from_millis(1),
        });
        let breaker = Arc::new(CircuitBreaker::new(
            "inv",
            CircuitBreakerConfig {
                sliding_window_size: 2,
                minimum_number_of_calls: 2,
                ..Default::default()
            },
        ));
        breaker.record_outcome(CallOutcome::Failure);
        breaker.record_outcome(CallOutcome::Failure);

        let pipeline = pipeline_with(remote.clone(), breaker, Duration::from_millis(500));
        let body = pipeline.call("p1").await;

        assert_eq!(body, CIRCUIT_OPEN_FALLBACK);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }
}
