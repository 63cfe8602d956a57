//! Rate limiting for upstream API calls
//!
//! Public nutrition databases publish per-endpoint request budgets (the Open
//! Food Facts search endpoint allows 10 requests per minute). A token bucket
//! per endpoint key keeps the adapters inside those budgets.
//!
//! # Example
//!
//! ```rust
//! use foodsearch_core::rate_limit::{RateLimiter, RateLimitConfig};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(10));
//!
//! if limiter.try_acquire("cgi") {
//!     // Proceed with API call
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            burst: 10,
        }
    }
}

impl RateLimitConfig {
    /// Create a strict rate limit (no burst)
    #[must_use]
    pub fn strict(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            burst: 0,
        }
    }

    /// Per-minute rate limit
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(60),
            burst: max / 4,
        }
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64().max(f64::EPSILON)
    }
}

/// Token bucket state
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    config: RateLimitConfig,
}

impl TokenBucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            tokens: f64::from(config.max_requests + config.burst),
            last_update: Instant::now(),
            config,
        }
    }

    fn try_acquire(&mut self, tokens: u32) -> bool {
        self.refill();

        if self.tokens >= f64::from(tokens) {
            self.tokens -= f64::from(tokens);
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        let new_tokens = elapsed.as_secs_f64() * self.config.refill_rate();

        self.tokens = (self.tokens + new_tokens)
            .min(f64::from(self.config.max_requests + self.config.burst));
        self.last_update = now;
    }

    fn time_until_available(&mut self, tokens: u32) -> Duration {
        self.refill();

        if self.tokens >= f64::from(tokens) {
            return Duration::ZERO;
        }

        let needed = f64::from(tokens) - self.tokens;
        Duration::from_secs_f64(needed / self.config.refill_rate())
    }
}

/// Rate limiter with one bucket per key
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, TokenBucket>>,
    default_config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            default_config: config,
        }
    }

    fn with_bucket<T>(&self, key: &str, f: impl FnOnce(&mut TokenBucket) -> T) -> T {
        // A poisoned lock still holds valid bucket data
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.default_config.clone()));
        f(bucket)
    }

    /// Try to acquire a token for the given key
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.with_bucket(key, |bucket| bucket.try_acquire(1))
    }

    /// Get time until `tokens` tokens are available for a key
    #[must_use]
    pub fn time_until_available(&self, key: &str, tokens: u32) -> Duration {
        self.with_bucket(key, |bucket| bucket.time_until_available(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_basic() {
        let limiter = RateLimiter::new(RateLimitConfig::strict(3, Duration::from_secs(60)));

        assert!(limiter.try_acquire("cgi"));
        assert!(limiter.try_acquire("cgi"));
        assert!(limiter.try_acquire("cgi"));
        assert!(!limiter.try_acquire("cgi"));
    }

    #[test]
    fn test_rate_limiter_with_burst() {
        let config = RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
            burst: 2,
        };
        let limiter = RateLimiter::new(config);

        // max + burst = 4 requests
        for _ in 0..4 {
            assert!(limiter.try_acquire("cgi"));
        }
        assert!(!limiter.try_acquire("cgi"));
    }

    #[test]
    fn test_rate_limiter_different_keys() {
        let limiter = RateLimiter::new(RateLimitConfig::strict(1, Duration::from_secs(60)));

        assert!(limiter.try_acquire("cgi"));
        assert!(!limiter.try_acquire("cgi"));
        assert!(limiter.try_acquire("rest"));
    }

    #[test]
    fn test_time_until_available_when_exhausted() {
        let limiter = RateLimiter::new(RateLimitConfig::strict(1, Duration::from_secs(60)));

        assert_eq!(limiter.time_until_available("cgi", 1), Duration::ZERO);
        assert!(limiter.try_acquire("cgi"));
        assert!(limiter.time_until_available("cgi", 1) > Duration::from_secs(50));
    }
}
