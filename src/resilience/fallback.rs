//! Fallback resolution for terminal failures.
//!
//! # Responsibilities
//! - Map a classified failure to a substitute response
//! - Evaluate rules in order, first match wins, catch-all last
//! - Never raise: a failing producer degrades to a static message
//!
//! # Design Decisions
//! - Dispatch is over the tagged `FailureKind`, not error types
//! - Each kind yields a distinct marker string so callers and tests can
//!   tell the cause apart

use crate::failure::{Failure, FailureKind};
use crate::observability::metrics;

/// Message returned when no rule matches or a producer fails.
pub const GENERIC_FALLBACK: &str = "Fallback: inventory lookup failed";

/// Marker for breaker rejections.
pub const CIRCUIT_OPEN_FALLBACK: &str = "Fallback: circuit open - call blocked immediately";

/// Marker for time-limited operations.
pub const TIMED_OUT_FALLBACK: &str = "Fallback: operation exceeded the time limit";

/// Marker for exhausted sync retries.
pub const RETRY_EXHAUSTED_FALLBACK: &str =
    "Stock unavailable (cache/default) - recovered via sync Fallback";

/// Error raised by a fallback producer.
#[derive(Debug, thiserror::Error)]
#[error("fallback producer failed: {0}")]
pub struct ProducerError(pub String);

type Predicate = Box<dyn Fn(&Failure) -> bool + Send + Sync>;
type Producer = Box<dyn Fn(&str, &Failure) -> Result<String, ProducerError> + Send + Sync>;

/// One `(predicate, producer)` entry in the resolution chain.
pub struct FallbackRule {
    matches: Predicate,
    produce: Producer,
}

impl FallbackRule {
    pub fn new<M, P>(matches: M, produce: P) -> Self
    where
        M: Fn(&Failure) -> bool + Send + Sync + 'static,
        P: Fn(&str, &Failure) -> Result<String, ProducerError> + Send + Sync + 'static,
    {
        Self {
            matches: Box::new(matches),
            produce: Box::new(produce),
        }
    }

    /// Rule matching a single failure kind.
    pub fn for_kind<P>(kind: FailureKind, produce: P) -> Self
    where
        P: Fn(&str, &Failure) -> Result<String, ProducerError> + Send + Sync + 'static,
    {
        Self::new(move |failure| failure.kind() == kind, produce)
    }
}

/// Ordered fallback chain shared by both pipelines.
pub struct FallbackResolver {
    rules: Vec<FallbackRule>,
}

impl FallbackResolver {
    /// Build a resolver from an explicit rule chain. The last rule should
    /// be a catch-all; [`FallbackResolver::standard`] is the production
    /// chain.
    pub fn with_rules(rules: Vec<FallbackRule>) -> Self {
        Self { rules }
    }

    /// The production chain: one rule per policy failure, then a
    /// catch-all that still distinguishes every known kind.
    pub fn standard() -> Self {
        Self::with_rules(vec![
            FallbackRule::for_kind(FailureKind::CircuitOpen, |_, _| {
                Ok(CIRCUIT_OPEN_FALLBACK.to_string())
            }),
            FallbackRule::for_kind(FailureKind::TimedOut, |_, _| {
                Ok(TIMED_OUT_FALLBACK.to_string())
            }),
            FallbackRule::for_kind(FailureKind::RetryExhausted, |_, _| {
                Ok(RETRY_EXHAUSTED_FALLBACK.to_string())
            }),
            FallbackRule::new(|_| true, |_, failure| Ok(catch_all_message(failure))),
        ])
    }

    /// Resolve a failure to a response body.
    ///
    /// Always returns a message; resolution itself cannot fail.
    pub fn resolve(&self, product_id: &str, failure: &Failure) -> String {
        metrics::record_fallback(failure.kind());

        for rule in &self.rules {
            if !(rule.matches)(failure) {
                continue;
            }
            return match (rule.produce)(product_id, failure) {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(
                        product_id = %product_id,
                        kind = failure.kind().as_str(),
                        error = %e,
                        "Fallback producer failed, serving generic message"
                    );
                    GENERIC_FALLBACK.to_string()
                }
            };
        }

        tracing::error!(
            product_id = %product_id,
            kind = failure.kind().as_str(),
            "No fallback rule matched, serving generic message"
        );
        GENERIC_FALLBACK.to_string()
    }
}

/// Terminal dispatch: a distinct marker per known kind, generic otherwise.
fn catch_all_message(failure: &Failure) -> String {
    match failure.kind() {
        FailureKind::CircuitOpen => CIRCUIT_OPEN_FALLBACK.to_string(),
        FailureKind::TimedOut => TIMED_OUT_FALLBACK.to_string(),
        FailureKind::RetryExhausted => RETRY_EXHAUSTED_FALLBACK.to_string(),
        FailureKind::Unclassified => format!("Generic Fallback: {failure}"),
        FailureKind::Remote => GENERIC_FALLBACK.to_string(),
    }
}
