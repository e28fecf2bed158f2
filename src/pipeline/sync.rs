//! Synchronous call path.
//!
//! Composition order: retry wraps the breaker wraps the remote. Each
//! retry attempt re-checks the gate; terminal failures resolve through
//! the fallback chain. The whole path runs on the caller's task,
//! blocking through backoff waits.

use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::remote::InventoryCall;
use crate::resilience::{FallbackResolver, RetryExecutor};

/// Retry-then-fallback pipeline for `GET .../sync`.
pub struct SyncPipeline {
    remote: Arc<dyn InventoryCall>,
    retry: RetryExecutor,
    fallback: Arc<FallbackResolver>,
}

impl SyncPipeline {
    pub fn new(
        remote: Arc<dyn InventoryCall>,
        retry: RetryExecutor,
        fallback: Arc<FallbackResolver>,
    ) -> Self {
        Self {
            remote,
            retry,
            fallback,
        }
    }

    /// Check stock for a product. Always produces a response body; this
    /// boundary never raises.
    pub async fn call(&self, product_id: &str) -> String {
        let started = Instant::now();
        let remote = self.remote.clone();

        let result = self
            .retry
            .execute(|| {
                let remote = remote.clone();
                let product_id = product_id.to_string();
                async move { remote.fetch_stock(&product_id).await }
            })
            .await;

        match result {
            Ok(body) => {
                metrics::record_call("sync", "success", started);
                body
            }
            Err(failure) => {
                tracing::warn!(
                    product_id = %product_id,
                    error = %failure,
                    "Sync inventory call failed, resolving fallback"
                );
                metrics::record_call("sync", failure.kind().as_str(), started);
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
    use crate::resilience::fallback::RETRY_EXHAUSTED_FALLBACK;
    use crate::resilience::{BackoffStrategy, CircuitBreaker};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyRemote {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait::async_trait]
    impl InventoryCall for FlakyRemote {
        async fn fetch_stock(&self, product_id: &str) -> Result<String, RemoteFailure> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(RemoteFailure::Status(500))
            } else {
                Ok(format!("In stock: {product_id}"))
            }
        }
    }

    fn pipeline(remote: Arc<FlakyRemote>, max_attempts: u32) -> SyncPipeline {
        let breaker = Arc::new(CircuitBreaker::new("inv", CircuitBreakerConfig::default()));
        let retry = RetryExecutor::new(
            max_attempts,
            BackoffStrategy::Fixed {
                delay: Duration::from_millis(1),
            },
            breaker,
        );
        SyncPipeline::new(remote, retry, Arc::new(FallbackResolver::standard()))
    }

    #[tokio::test]
    async fn transient_failure_recovers_within_retry_budget() {
        let remote = Arc::new(FlakyRemote {
            calls: AtomicU32::new(0),
            failures: 1,
        });
        let pipeline = pipeline(remote.clone(), 3);

        let body = pipeline.call("p42").await;
        assert_eq!(body, "In stock: p42");
        // Exactly two remote invocations, no fallback.
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_resolve_to_the_sync_fallback() {
        let remote = Arc::new(FlakyRemote {
            calls: AtomicU32::new(0),
            failures: u32::MAX,
        });
        let pipeline = pipeline(remote.clone(), 3);

        let body = pipeline.call("p42").await;
        assert_eq!(body, RETRY_EXHAUSTED_FALLBACK);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 3);
    }
}
