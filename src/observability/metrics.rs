//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): calls by path (sync/async) and
//!   outcome (success or failure kind)
//! - `gateway_request_duration_seconds` (histogram): pipeline latency
//! - `gateway_fallbacks_total` (counter): fallback resolutions by kind
//! - `gateway_breaker_state` (gauge): 0=closed, 1=half-open, 2=open
//!
//! # Design Decisions
//! - Metric updates are cheap and always-on; only the Prometheus
//!   exposition endpoint is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::failure::FailureKind;
use crate::resilience::breaker::BreakerState;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one pipeline invocation.
pub fn record_call(path: &'static str, outcome: &'static str, start: Instant) {
    counter!("gateway_requests_total", "path" => path, "outcome" => outcome).increment(1);
    histogram!("gateway_request_duration_seconds", "path" => path)
        .record(start.elapsed().as_secs_f64());
}

/// Record a fallback resolution.
pub fn record_fallback(kind: FailureKind) {
    counter!("gateway_fallbacks_total", "kind" => kind.as_str()).increment(1);
}

/// Record a breaker state transition.
pub fn record_breaker_state(dependency: &str, state: BreakerState) {
    let value = match state {
        BreakerState::Closed => 0.0,
        BreakerState::HalfOpen => 1.0,
        BreakerState::Open => 2.0,
    };
    gauge!("gateway_breaker_state", "dependency" => dependency.to_string()).set(value);
}
