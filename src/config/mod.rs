//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value to all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; resilience policies are built from
//!   it exactly once at process start
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CircuitBreakerConfig, GatewayConfig, InventoryConfig, ListenerConfig, ObservabilityConfig,
    RetryConfig, TimeLimiterConfig, WorkerPoolConfig,
};
