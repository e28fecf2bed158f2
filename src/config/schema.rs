//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files, and every field has a default so a minimal config is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the inventory gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote inventory service settings.
    pub inventory: InventoryConfig,

    /// Circuit breaker settings, shared by both call paths.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Retry settings for the sync path.
    pub retry: RetryConfig,

    /// Time limiter settings for the async path.
    pub time_limiter: TimeLimiterConfig,

    /// Worker pool backing the async path.
    pub worker_pool: WorkerPoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Remote inventory service configuration.
///
/// The target address is configuration, never hardcoded in the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Logical dependency name; scopes the circuit breaker.
    pub name: String,

    /// Base URL of the inventory lookup endpoint. The product id is
    /// appended as a path segment.
    pub base_url: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            name: "inventory-service".to_string(),
            base_url: "http://localhost:9090/api/inventory".to_string(),
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of recent call outcomes kept in the sliding window.
    pub sliding_window_size: usize,

    /// Minimum recorded outcomes before the failure rate is evaluated.
    pub minimum_number_of_calls: usize,

    /// Failure-rate percentage above which the breaker opens.
    /// The comparison is strict: the breaker trips when rate > threshold.
    pub failure_rate_threshold: f32,

    /// How long the breaker stays open before probing recovery.
    pub wait_duration_in_open_state_ms: u64,

    /// Trial calls allowed through while half-open.
    pub permitted_calls_in_half_open_state: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sliding_window_size: 10,
            minimum_number_of_calls: 5,
            failure_rate_threshold: 50.0,
            wait_duration_in_open_state_ms: 10_000,
            permitted_calls_in_half_open_state: 2,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn wait_duration(&self) -> Duration {
        Duration::from_millis(self.wait_duration_in_open_state_ms)
    }
}

/// Retry configuration for the sync path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, first call included.
    pub max_attempts: u32,

    /// Backoff strategy id: "fixed" or "exponential".
    pub backoff: String,

    /// Base delay between attempts in milliseconds. For the fixed
    /// strategy this is the whole delay.
    pub base_delay_ms: u64,

    /// Cap on the exponential delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: "exponential".to_string(),
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Time limiter configuration for the async path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeLimiterConfig {
    /// Wall-clock bound for a single async invocation in milliseconds.
    pub duration_ms: u64,

    /// Whether the overrunning operation is dropped on timeout. When
    /// false it is detached to run to completion and its result discarded.
    pub cancel_on_timeout: bool,
}

impl Default for TimeLimiterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            cancel_on_timeout: true,
        }
    }
}

impl TimeLimiterConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Worker pool configuration for the async path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Number of worker tasks.
    pub size: usize,

    /// Queued jobs accepted beyond the busy workers. A full queue makes
    /// submission wait; it never rejects.
    pub queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            size: 5,
            queue_capacity: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9464".to_string(),
        }
    }
}
