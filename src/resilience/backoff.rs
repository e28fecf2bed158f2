//! Backoff strategies for retry delays.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Maps an attempt index to the delay before the next attempt.
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    /// The same delay after every attempt.
    Fixed { delay: Duration },
    /// Exponential growth with a cap and jitter.
    Exponential { base_ms: u64, max_ms: u64 },
}

impl BackoffStrategy {
    /// Build the strategy named by the retry configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        match config.backoff.as_str() {
            "fixed" => BackoffStrategy::Fixed {
                delay: Duration::from_millis(config.base_delay_ms),
            },
            _ => BackoffStrategy::Exponential {
                base_ms: config.base_delay_ms,
                max_ms: config.max_delay_ms,
            },
        }
    }

    /// Delay to wait after `attempt` attempts have completed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            BackoffStrategy::Fixed { delay } => delay,
            BackoffStrategy::Exponential { base_ms, max_ms } => {
                exponential_backoff(attempt, base_ms, max_ms)
            }
        }
    }
}

/// Exponential backoff with jitter (0 to 10% of the delay).
fn exponential_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_grows_and_caps() {
        let strategy = BackoffStrategy::Exponential {
            base_ms: 100,
            max_ms: 2000,
        };

        let b1 = strategy.delay_for(1);
        assert!(b1.as_millis() >= 100);

        let b2 = strategy.delay_for(2);
        assert!(b2.as_millis() >= 200);

        let capped = strategy.delay_for(10);
        assert!(capped.as_millis() >= 2000);
        assert!(capped.as_millis() <= 2200);
    }

    #[test]
    fn fixed_ignores_attempt_index() {
        let strategy = BackoffStrategy::Fixed {
            delay: Duration::from_millis(250),
        };
        assert_eq!(strategy.delay_for(1), strategy.delay_for(7));
    }

    #[test]
    fn strategy_id_selects_variant() {
        let mut config = RetryConfig::default();
        config.backoff = "fixed".to_string();
        assert!(matches!(
            BackoffStrategy::from_config(&config),
            BackoffStrategy::Fixed { .. }
        ));
        config.backoff = "exponential".to_string();
        assert!(matches!(
            BackoffStrategy::from_config(&config),
            BackoffStrategy::Exponential { .. }
        ));
    }
}
