//! Configuration validation.
//!
//! Serde handles the syntactic side; this module performs semantic checks
//! (value ranges, referential consistency between knobs) and reports all
//! violations at once instead of stopping at the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("inventory.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("circuit_breaker.sliding_window_size must be at least 1")]
    WindowSizeZero,

    #[error("circuit_breaker.minimum_number_of_calls ({minimum}) exceeds sliding_window_size ({window})")]
    MinimumCallsExceedsWindow { minimum: usize, window: usize },

    #[error("circuit_breaker.failure_rate_threshold must be within (0, 100], got {0}")]
    ThresholdOutOfRange(f32),

    #[error("circuit_breaker.permitted_calls_in_half_open_state must be at least 1")]
    NoHalfOpenPermits,

    #[error("retry.max_attempts must be at least 1")]
    NoRetryAttempts,

    #[error("retry.backoff '{0}' is not a known strategy (expected 'fixed' or 'exponential')")]
    UnknownBackoff(String),

    #[error("retry.base_delay_ms ({base}) exceeds retry.max_delay_ms ({max})")]
    BackoffBaseExceedsMax { base: u64, max: u64 },

    #[error("time_limiter.duration_ms must be greater than 0")]
    ZeroTimeLimit,

    #[error("worker_pool.size must be at least 1")]
    EmptyWorkerPool,

    #[error("worker_pool.queue_capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if Url::parse(&config.inventory.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.inventory.base_url.clone()));
    }

    let cb = &config.circuit_breaker;
    if cb.sliding_window_size == 0 {
        errors.push(ValidationError::WindowSizeZero);
    }
    if cb.minimum_number_of_calls > cb.sliding_window_size {
        errors.push(ValidationError::MinimumCallsExceedsWindow {
            minimum: cb.minimum_number_of_calls,
            window: cb.sliding_window_size,
        });
    }
    if !(cb.failure_rate_threshold > 0.0 && cb.failure_rate_threshold <= 100.0) {
        errors.push(ValidationError::ThresholdOutOfRange(cb.failure_rate_threshold));
    }
    if cb.permitted_calls_in_half_open_state == 0 {
        errors.push(ValidationError::NoHalfOpenPermits);
    }

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::NoRetryAttempts);
    }
    match config.retry.backoff.as_str() {
        "fixed" | "exponential" => {}
        other => errors.push(ValidationError::UnknownBackoff(other.to_string())),
    }
    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        errors.push(ValidationError::BackoffBaseExceedsMax {
            base: config.retry.base_delay_ms,
            max: config.retry.max_delay_ms,
        });
    }

    if config.time_limiter.duration_ms == 0 {
        errors.push(ValidationError::ZeroTimeLimit);
    }

    if config.worker_pool.size == 0 {
        errors.push(ValidationError::EmptyWorkerPool);
    }
    if config.worker_pool.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_violations() {
        let mut config = GatewayConfig::default();
        config.circuit_breaker.sliding_window_size = 2;
        config.circuit_breaker.minimum_number_of_calls = 5;
        config.retry.backoff = "quadratic".to_string();
        config.worker_pool.size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyWorkerPool));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownBackoff(_))));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = GatewayConfig::default();
        config.circuit_breaker.failure_rate_threshold = 0.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ThresholdOutOfRange(0.0)]);
    }
}
