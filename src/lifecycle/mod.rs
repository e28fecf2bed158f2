//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build pipelines → Bind listener → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT (signals.rs)
//!         → shutdown.rs broadcast
//!         → HTTP server stops accepting
//!         → worker pool drains, stragglers aborted after a grace period
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
