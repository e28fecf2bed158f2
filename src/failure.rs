//! Failure taxonomy for guarded inventory calls.
//!
//! Every error that can terminate a pipeline invocation is one of these
//! variants. The fallback chain dispatches on [`FailureKind`], an explicit
//! tag, rather than on error types.

use std::time::Duration;

use thiserror::Error;

/// A single classified failure raised by the remote caller.
#[derive(Debug, Clone, Error)]
pub enum RemoteFailure {
    /// The connection to the inventory service could not be established
    /// or broke mid-request.
    #[error("inventory connection error: {0}")]
    Connection(String),

    /// The inventory service answered with a non-2xx status.
    #[error("inventory service returned status {0}")]
    Status(u16),

    /// The response arrived but its body could not be read.
    #[error("malformed inventory response: {0}")]
    Malformed(String),
}

impl RemoteFailure {
    /// Whether another attempt against the remote is worthwhile.
    ///
    /// Connection errors and 5xx are retryable; 4xx means the request
    /// itself is wrong, and a malformed body will not improve on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteFailure::Connection(_) => true,
            RemoteFailure::Status(code) => *code >= 500,
            RemoteFailure::Malformed(_) => false,
        }
    }
}

/// Terminal failure of a pipeline invocation.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    /// The circuit breaker rejected the call before it reached the remote.
    #[error("circuit open: call rejected without reaching the inventory service")]
    CircuitOpen,

    /// The async operation exceeded its wall-clock bound.
    #[error("inventory call exceeded the {limit:?} time limit")]
    TimedOut { limit: Duration },

    /// Every sync attempt failed and the retry budget ran out.
    #[error("all {attempts} attempts against the inventory service failed: {last}")]
    RetryExhausted { attempts: u32, last: Box<Failure> },

    /// A single classified failure from the remote caller.
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    /// Anything that does not match a known kind.
    #[error("unclassified failure: {0}")]
    Unclassified(String),
}

/// Tagged failure kind used by the fallback dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    CircuitOpen,
    TimedOut,
    RetryExhausted,
    Remote,
    Unclassified,
}

impl FailureKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::CircuitOpen => "circuit_open",
            FailureKind::TimedOut => "timed_out",
            FailureKind::RetryExhausted => "retry_exhausted",
            FailureKind::Remote => "remote",
            FailureKind::Unclassified => "unclassified",
        }
    }
}

impl Failure {
    /// Classify this failure for fallback dispatch.
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::CircuitOpen => FailureKind::CircuitOpen,
            Failure::TimedOut { .. } => FailureKind::TimedOut,
            Failure::RetryExhausted { .. } => FailureKind::RetryExhausted,
            Failure::Remote(_) => FailureKind::Remote,
            Failure::Unclassified(_) => FailureKind::Unclassified,
        }
    }

    /// Whether the retry executor may attempt the call again.
    ///
    /// Breaker rejections are never retried: the gate already decided the
    /// remote should not be called.
    pub fn is_retryable(&self) -> bool {
        match self {
            Failure::Remote(remote) => remote.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_retryability_follows_classification() {
        assert!(RemoteFailure::Connection("refused".into()).is_retryable());
        assert!(RemoteFailure::Status(500).is_retryable());
        assert!(RemoteFailure::Status(503).is_retryable());
        assert!(!RemoteFailure::Status(404).is_retryable());
        assert!(!RemoteFailure::Malformed("truncated".into()).is_retryable());
    }

    #[test]
    fn only_remote_failures_are_retryable() {
        assert!(!Failure::CircuitOpen.is_retryable());
        assert!(!Failure::TimedOut { limit: Duration::from_secs(1) }.is_retryable());
        assert!(Failure::Remote(RemoteFailure::Status(502)).is_retryable());
        assert!(!Failure::Unclassified("?".into()).is_retryable());
    }

    #[test]
    fn kinds_are_distinct() {
        let exhausted = Failure::RetryExhausted {
            attempts: 3,
            last: Box::new(Failure::Remote(RemoteFailure::Status(500))),
        };
        assert_eq!(exhausted.kind(), FailureKind::RetryExhausted);
        assert_eq!(Failure::CircuitOpen.kind(), FailureKind::CircuitOpen);
        assert_ne!(Failure::CircuitOpen.kind(), exhausted.kind());
    }
}
