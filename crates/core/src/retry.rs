//! Retry logic with exponential backoff
//!
//! Upstream nutrition APIs fail transiently (timeouts, 5xx, throttling).
//! This module provides:
//! - Exponential backoff with jitter
//! - Configurable retry policies
//! - Circuit breaker pattern
//!
//! Retries belong to the adapter layer. The ranking engine never retries;
//! it treats an adapter failure as an empty candidate list.
//!
//! # Example
//!
//! ```rust,no_run
//! use foodsearch_core::retry::{retry_async, RetryConfig};
//!
//! # async fn run() {
//! let outcome = retry_async(&RetryConfig::quick(), |_: &std::io::Error| true, || async {
//!     Ok::<_, std::io::Error>("payload")
//! })
//! .await;
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a config for quick retries (interactive searches)
    #[must_use]
    pub fn quick() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Create a config with no retries
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Calculate delay for a given attempt
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            // Up to 25% jitter
            delay_secs * (1.0 + jitter_fraction() * 0.25)
        } else {
            delay_secs
        };

        Duration::from_secs_f64(final_delay)
    }
}

/// Cheap pseudo-random fraction in `[0, 1)`
fn jitter_fraction() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    hasher.write_u32(nanos);
    f64::from(u32::try_from(hasher.finish() % 1000).unwrap_or(0)) / 1000.0
}

/// Outcome of a retried operation
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Final result: the first success or the last error
    pub result: Result<T, E>,
    /// Number of attempts made
    pub attempts: u32,
    /// Total time spent, including backoff sleeps
    pub total_duration: Duration,
}

/// Run an async operation, retrying while `is_retryable` approves the error.
///
/// Sleeps with `tokio::time::sleep` between attempts, so it never blocks a
/// runtime worker.
pub async fn retry_async<F, Fut, T, E, R>(
    config: &RetryConfig,
    is_retryable: R,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis(), "Retrying after delay");
            tokio::time::sleep(delay).await;
        }

        let result = operation().await;
        attempt += 1;

        match result {
            Err(ref e) if attempt < max_attempts && is_retryable(e) => {
                tracing::debug!(attempt, error = %e, "Attempt failed, will retry");
            }
            result => {
                return RetryOutcome {
                    result,
                    attempts: attempt,
                    total_duration: start.elapsed(),
                };
            }
        }
    }
}

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls pass through
    Closed,
    /// Calls are refused until the reset timeout elapses
    Open,
    /// Trial calls decide whether to close again
    HalfOpen,
}

/// Circuit breaker for preventing cascading failures
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: RwLock<CircuitState>,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    last_failure_time: AtomicU64,
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Number of failures before opening circuit
    pub failure_threshold: u32,
    /// Number of successes in half-open to close circuit
    pub success_threshold: u32,
    /// Time to wait before trying half-open
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            last_failure_time: AtomicU64::new(0),
        }
    }

    /// Get current state
    pub fn state(&self) -> CircuitState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: CircuitState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Check if circuit allows execution
    pub fn can_execute(&self) -> bool {
        match self.state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let last_failure = self.last_failure_time.load(Ordering::Relaxed);
                if now_secs().saturating_sub(last_failure) >= self.config.reset_timeout.as_secs() {
                    self.set_state(CircuitState::HalfOpen);
                    self.success_count.store(0, Ordering::Relaxed);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful execution
    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);

        if self.state() == CircuitState::HalfOpen {
            let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
            if successes >= self.config.success_threshold {
                self.set_state(CircuitState::Closed);
            }
        }
    }

    /// Record a failed execution
    pub fn record_failure(&self) {
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.last_failure_time.store(now_secs(), Ordering::Relaxed);

        match self.state() {
            CircuitState::Closed if failures >= self.config.failure_threshold => {
                tracing::warn!(failures, "Circuit breaker opened");
                self.set_state(CircuitState::Open);
            }
            // Any failure in half-open goes back to open
            CircuitState::HalfOpen => self.set_state(CircuitState::Open),
            _ => {}
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let outcome = retry_async(&fast(), |_: &String| true, || async { Ok::<_, String>(7) }).await;

        assert_eq!(outcome.result.unwrap(), 7);
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let calls = Cell::new(0);
        let outcome = retry_async(&fast(), |_: &String| true, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 { Err("not yet".to_string()) } else { Ok("success") }
            }
        })
        .await;

        assert_eq!(outcome.result.unwrap(), "success");
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test]
    async fn test_retry_stops_on_non_retryable() {
        let outcome = retry_async(&fast(), |e: &String| e != "fatal", || async {
            Err::<(), _>("fatal".to_string())
        })
        .await;

        assert!(outcome.result.is_err());
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_all_failures() {
        let outcome =
            retry_async(&fast(), |_: &String| true, || async { Err::<(), _>("down".to_string()) })
                .await;

        assert!(outcome.result.is_err());
        assert_eq!(outcome.attempts, 3);
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(2),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(2));
    }

    #[test]
    fn test_circuit_breaker_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(cb.can_execute());
    }

    #[test]
    fn test_circuit_breaker_opens_on_failures() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            ..Default::default()
        };
        let cb = CircuitBreaker::new(config);

        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Closed);

        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.can_execute());
    }

    #[test]
    fn test_circuit_breaker_half_open_after_timeout() {
        let config = CircuitBreakerConfig {
            failure_threshold: 1,
            success_threshold: 1,
            reset_timeout: Duration::ZERO,
        };
        let cb = CircuitBreaker::new(config);

        cb.record_failure();
        assert!(cb.can_execute());
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        cb.record_success();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn test_circuit_breaker_half_open_failure_reopens() {
        let config = CircuitBreakerConfig {
            failure_threshold: 1,
            success_threshold: 2,
            reset_timeout: Duration::ZERO,
        };
        let cb = CircuitBreaker::new(config);

        cb.record_failure();
        assert!(cb.can_execute());
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);
    }
}
