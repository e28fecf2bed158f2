//! Pipeline composition subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/products/{id}/sync
//!     → sync.rs: RetryExecutor(CircuitBreaker(RemoteCaller))
//!     → on terminal failure: FallbackResolver
//!
//! GET /api/products/{id}/async
//!     → async_path.rs: TimeLimiter(worker.rs pool → CircuitBreaker(RemoteCaller))
//!     → on any failure (rejection, timeout, remote): FallbackResolver
//! ```
//!
//! # Design Decisions
//! - The two paths compose the same primitives in intentionally
//!   different orders; both share one breaker per dependency
//! - The worker pool is owned here: created at startup, injected into
//!   the async path, drained at shutdown

pub mod async_path;
pub mod sync;
pub mod worker;

pub use async_path::AsyncPipeline;
pub use sync::SyncPipeline;
pub use worker::WorkerPool;
