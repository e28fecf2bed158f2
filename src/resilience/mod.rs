//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Sync call:
//!     retry.rs (attempt loop, backoff.rs delays)
//!         → breaker.rs (permit gate, outcome recording)
//!         → remote caller
//!     terminal failure → fallback.rs (ordered rule chain)
//!
//! Async call:
//!     time_limiter.rs (wall-clock bound)
//!         → worker pool → breaker.rs → remote caller
//!     terminal failure → fallback.rs
//! ```
//!
//! # Design Decisions
//! - Policies are explicit decorators composed in the pipeline layer,
//!   not woven in by a framework
//! - The breaker is the single shared gate; retry and the time limiter
//!   each wrap it in their own order per call path
//! - Every terminal failure resolves to a response; nothing escapes raw

pub mod backoff;
pub mod breaker;
pub mod fallback;
pub mod registry;
pub mod retry;
pub mod time_limiter;

pub use backoff::BackoffStrategy;
pub use breaker::{BreakerState, CallOutcome, CircuitBreaker, Permit};
pub use fallback::{FallbackResolver, FallbackRule};
pub use registry::BreakerRegistry;
pub use retry::RetryExecutor;
pub use time_limiter::TimeLimiter;
