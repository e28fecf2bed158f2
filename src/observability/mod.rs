//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing, request id attached)
//!     → metrics.rs (counters, histogram, breaker gauge)
//!
//! Consumers:
//!     → stdout logs (env-filtered)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod metrics;
