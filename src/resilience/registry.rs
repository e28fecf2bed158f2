//! Per-dependency breaker registry.
//!
//! Exactly one breaker instance exists per logical remote dependency;
//! every pipeline guarding that dependency shares it through this
//! registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::CircuitBreakerConfig;
use crate::resilience::breaker::CircuitBreaker;

/// Shared store of circuit breakers keyed by dependency name.
pub struct BreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// The breaker for `dependency`, created on first use.
    pub fn get_or_create(&self, dependency: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(dependency.to_string())
            .or_insert_with(|| {
                tracing::debug!(dependency = %dependency, "Creating circuit breaker");
                Arc::new(CircuitBreaker::new(dependency, self.config.clone()))
            })
            .clone()
    }
}
