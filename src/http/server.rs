//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the two product endpoints
//! - Wire up middleware (tracing, request ID)
//! - Assemble the resilience pipelines from configuration
//! - Serve with graceful shutdown and drain the worker pool afterwards
//!
//! The HTTP layer is a thin I/O wrapper: handlers delegate straight to
//! the pipelines, which always produce a body and never raise.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::pipeline::{AsyncPipeline, SyncPipeline, WorkerPool};
use crate::remote::{HttpInventoryClient, InventoryCall};
use crate::resilience::{BackoffStrategy, BreakerRegistry, FallbackResolver, RetryExecutor, TimeLimiter};

/// How long shutdown waits for workers to finish their current job.
const POOL_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sync_pipeline: Arc<SyncPipeline>,
    pub async_pipeline: Arc<AsyncPipeline>,
}

/// HTTP server for the inventory gateway.
pub struct HttpServer {
    router: Router,
    pool: Arc<WorkerPool>,
}

impl HttpServer {
    /// Assemble pipelines and router from configuration.
    ///
    /// Both pipelines share the one breaker registered for the inventory
    /// dependency; the worker pool and fallback chain are built here and
    /// live for the process lifetime.
    pub fn new(config: GatewayConfig) -> Result<Self, url::ParseError> {
        let remote: Arc<dyn InventoryCall> = Arc::new(HttpInventoryClient::new(&config.inventory)?);

        let registry = BreakerRegistry::new(config.circuit_breaker.clone());
        let breaker = registry.get_or_create(&config.inventory.name);

        let fallback = Arc::new(FallbackResolver::standard());

        let retry = RetryExecutor::new(
            config.retry.max_attempts,
            BackoffStrategy::from_config(&config.retry),
            breaker.clone(),
        );
        let sync_pipeline = Arc::new(SyncPipeline::new(remote.clone(), retry, fallback.clone()));

        let pool = Arc::new(WorkerPool::new(
            config.worker_pool.size,
            config.worker_pool.queue_capacity,
            remote,
            breaker,
        ));
        let limiter = TimeLimiter::new(
            config.time_limiter.duration(),
            config.time_limiter.cancel_on_timeout,
        );
        let async_pipeline = Arc::new(AsyncPipeline::new(pool.clone(), limiter, fallback));

        let state = AppState {
            sync_pipeline,
            async_pipeline,
        };

        Ok(Self {
            router: Self::build_router(state),
            pool,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/api/products/{id}/sync", get(check_stock_sync))
            .route("/api/products/{id}/async", get(check_stock_async))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until the shutdown signal fires, then drain the
    /// worker pool.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, stopping HTTP server");
            })
            .await?;

        self.pool.shutdown(POOL_DRAIN_GRACE).await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /api/products/{id}/sync`: retry-wrapped, breaker-guarded call.
async fn check_stock_sync(State(state): State<AppState>, Path(id): Path<String>) -> String {
    tracing::debug!(product_id = %id, "Sync stock check");
    state.sync_pipeline.call(&id).await
}

/// `GET /api/products/{id}/async`: time-limited call on the worker pool.
async fn check_stock_async(State(state): State<AppState>, Path(id): Path<String>) -> String {
    tracing::debug!(product_id = %id, "Async stock check");
    state.async_pipeline.call(&id).await
}
