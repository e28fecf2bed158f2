//! Bounded worker pool for the async call path.
//!
//! # Responsibilities
//! - Run breaker-guarded remote calls on a fixed set of worker tasks
//! - Queue submissions when all workers are busy (backpressure, never
//!   rejection)
//! - Drain or forcibly cancel outstanding work on shutdown
//!
//! # Design Decisions
//! - One bounded mpsc queue feeds all workers; replies travel back on
//!   per-job oneshot channels
//! - A job whose caller already gave up is skipped before it reaches the
//!   remote; a job abandoned mid-call still completes and records its
//!   outcome so the breaker's view stays accurate

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time;

use crate::failure::Failure;
use crate::remote::InventoryCall;
use crate::resilience::breaker::{CallOutcome, CircuitBreaker, Permit};

struct Job {
    product_id: String,
    reply: oneshot::Sender<Result<String, Failure>>,
}

/// Fixed-size pool of worker tasks guarding the async path.
pub struct WorkerPool {
    queue: std::sync::Mutex<Option<mpsc::Sender<Job>>>,
    handles: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `size` workers consuming a queue of `queue_capacity` jobs.
    pub fn new(
        size: usize,
        queue_capacity: usize,
        remote: Arc<dyn InventoryCall>,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Job>(queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(size);
        for worker_id in 0..size {
            let rx = rx.clone();
            let remote = remote.clone();
            let breaker = breaker.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    match job {
                        Some(job) => Self::run_job(&*remote, &breaker, job).await,
                        // Queue closed and drained: pool is shutting down.
                        None => break,
                    }
                }
                tracing::debug!(worker_id, "Worker stopped");
            }));
        }

        Self {
            queue: std::sync::Mutex::new(Some(tx)),
            handles: std::sync::Mutex::new(handles),
        }
    }

    async fn run_job(remote: &dyn InventoryCall, breaker: &CircuitBreaker, job: Job) {
        if job.reply.is_closed() {
            tracing::debug!(product_id = %job.product_id, "Caller abandoned queued job, skipping");
            return;
        }

        // Fast path: a rejected permit never reaches the remote.
        if breaker.permit() == Permit::Rejected {
            let _ = job.reply.send(Err(Failure::CircuitOpen));
            return;
        }

        let result = remote.fetch_stock(&job.product_id).await;
        breaker.record_outcome(match &result {
            Ok(_) => CallOutcome::Success,
            Err(_) => CallOutcome::Failure,
        });

        // The caller may have timed out meanwhile; the outcome above is
        // recorded either way and the send just fails silently.
        let _ = job.reply.send(result.map_err(Failure::from));
    }

    /// Submit a call and await its outcome.
    ///
    /// A full queue makes this wait for a slot rather than reject.
    pub async fn submit(&self, product_id: &str) -> Result<String, Failure> {
        let sender = match &*self.queue.lock().expect("worker queue mutex poisoned") {
            Some(sender) => sender.clone(),
            None => return Err(Failure::Unclassified("worker pool is shut down".into())),
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let job = Job {
            product_id: product_id.to_string(),
            reply: reply_tx,
        };

        if sender.send(job).await.is_err() {
            return Err(Failure::Unclassified("worker pool is shut down".into()));
        }

        match reply_rx.await {
            Ok(result) => result,
            Err(_) => Err(Failure::Unclassified("worker abandoned the call".into())),
        }
    }

    /// Close the queue, let workers drain it, then abort stragglers
    /// after `grace`.
    pub async fn shutdown(&self, grace: Duration) {
        drop(self.queue.lock().expect("worker queue mutex poisoned").take());

        let handles: Vec<_> = {
            let mut guard = self.handles.lock().expect("worker handles mutex poisoned");
            guard.drain(..).collect()
        };
        for mut handle in handles {
            if time::timeout(grace, &mut handle).await.is_err() {
                tracing::warn!("Worker did not stop within grace period, aborting");
                handle.abort();
            }
        }
        tracing::info!("Worker pool stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::config::CircuitBreakerConfig;
    use crate::failure::{FailureKind, RemoteFailure};

    /// Scripted remote: counts calls, optionally sleeps, returns a fixed
    /// result.
    struct ScriptedRemote {
        calls: AtomicU32,
        in_flight: AtomicU32,
        max_in_flight: AtomicU32,
        delay: Duration,
        fail: bool,
    }

    impl ScriptedRemote {
        fn new(delay: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                in_flight: AtomicU32::new(0),
                max_in_flight: AtomicU32::new(0),
                delay,
                fail,
            })
        }
    }

    #[async_trait::async_trait]
    impl InventoryCall for ScriptedRemote {
        async fn fetch_stock(&self, product_id: &str) -> Result<String, RemoteFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail {
                Err(RemoteFailure::Status(500))
            } else {
                Ok(format!("stock for {product_id}"))
            }
        }
    }

    fn breaker() -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new("inv", CircuitBreakerConfig::default()))
    }

    #[tokio::test]
    async fn serves_jobs_through_workers() {
        let remote = ScriptedRemote::new(Duration::from_millis(1), false);
        let pool = WorkerPool::new(2, 8, remote.clone(), breaker());

        let body = pool.submit("p1").await.unwrap();
        assert_eq!(body, "stock for p1");
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pool_size_bounds_concurrency() {
        let remote = ScriptedRemote::new(Duration::from_millis(40), false);
        let pool = Arc::new(WorkerPool::new(2, 16, remote.clone(), breaker()));

        let mut tasks = Vec::new();
        for i in 0..6 {
            let pool = pool.clone();
            tasks.push(tokio::spawn(async move {
                pool.submit(&format!("p{i}")).await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert_eq!(remote.calls.load(Ordering::SeqCst), 6);
        assert!(
            remote.max_in_flight.load(Ordering::SeqCst) <= 2,
            "no more than pool-size calls may run at once"
        );
    }

    #[tokio::test]
    async fn rejected_permit_never_reaches_the_remote() {
        let remote = ScriptedRemote::new(Duration::from_millis(1), false);
        let open_breaker = Arc::new(CircuitBreaker::new(
            "inv",
            CircuitBreakerConfig {
                sliding_window_size: 2,
                minimum_number_of_calls: 2,
                ..Default::default()
            },
        ));
        open_breaker.record_outcome(CallOutcome::Failure);
        open_breaker.record_outcome(CallOutcome::Failure);

        let pool = WorkerPool::new(2, 8, remote.clone(), open_breaker);
        let result = pool.submit("p1").await;

        assert_eq!(result.unwrap_err().kind(), FailureKind::CircuitOpen);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shutdown_drains_then_refuses_new_work() {
        let remote = ScriptedRemote::new(Duration::from_millis(5), false);
        let pool = WorkerPool::new(2, 8, remote.clone(), breaker());

        assert!(pool.submit("p1").await.is_ok());
        pool.shutdown(Duration::from_secs(1)).await;

        let result = pool.submit("p2").await;
        assert_eq!(result.unwrap_err().kind(), FailureKind::Unclassified);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_outcomes_feed_the_shared_breaker() {
        let remote = ScriptedRemote::new(Duration::from_millis(1), true);
        let shared = Arc::new(CircuitBreaker::new(
            "inv",
            CircuitBreakerConfig {
                sliding_window_size: 3,
                minimum_number_of_calls: 3,
                ..Default::default()
            },
        ));
        let pool = WorkerPool::new(1, 8, remote, shared.clone());

        for _ in 0..3 {
            let _ = pool.submit("p1").await;
        }
        assert_eq!(shared.state(), crate::resilience::BreakerState::Open);
    }
}
