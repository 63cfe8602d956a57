//! Core utilities for the Foodshare food search engine
//!
//! This crate provides the pieces shared by the engine, the source adapters
//! and the CLI:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Retry**: Exponential backoff with jitter and a circuit breaker
//! - **Rate limiting**: Token buckets keyed by upstream endpoint
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use foodsearch_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("max results: {}", config.schema.search.max_results);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, FetchStrategy};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{retry_async, CircuitBreaker, RetryConfig};
}
