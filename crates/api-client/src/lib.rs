//! Source adapters for the Foodshare food search engine
//!
//! This crate connects [`foodsearch_engine::SearchEngine`] to real
//! upstreams through a resilient HTTP client.
//!
//! # Features
//!
//! - **Config-file + environment configuration**: `[external]` and `[local]`
//!   sections with `FOODSEARCH_*` overrides
//! - **Retry with exponential backoff**: Automatic retry for transient failures
//! - **Circuit breaker**: Stop hammering an upstream during outages
//! - **Rate limiting**: Stay inside the upstream's published request budget
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use foodsearch_core::config::Config;
//! use foodsearch_engine::SearchOptions;
//! use foodsearch_sources::{build_engine, SourcesConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let sources = SourcesConfig::from_schema(&config.schema)?;
//!     let engine = build_engine(sources, SearchOptions::from(&config.schema.search), true)?;
//!
//!     for result in engine.search("rolled oats").await {
//!         println!("{:>4}  {}", result.score, result.name);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

use foodsearch_engine::{SearchEngine, SearchOptions};
use std::sync::Arc;

pub use client::SourceClient;
pub use config::{ClientConfig, SourcesConfig};
pub use endpoints::{OpenFoodFactsSource, PostgrestFoodStore};
pub use error::{ApiError, ApiResult};

/// Build an engine wired to the configured upstreams.
///
/// The external source is skipped when `include_external` is false. The
/// local store is attached only when a store URL is configured; callers may
/// replace it afterwards with [`SearchEngine::with_local`].
pub fn build_engine(
    sources: SourcesConfig,
    options: SearchOptions,
    include_external: bool,
) -> ApiResult<SearchEngine> {
    let mut engine = SearchEngine::new(options);

    if include_external {
        engine = engine.with_external(Arc::new(OpenFoodFactsSource::new(sources.external)?));
    }
    if let Some(local) = sources.local {
        engine = engine.with_local(Arc::new(PostgrestFoodStore::new(local)?));
    }

    Ok(engine)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::build_engine;
    pub use crate::client::SourceClient;
    pub use crate::config::{ClientConfig, SourcesConfig};
    pub use crate::endpoints::{OpenFoodFactsSource, PostgrestFoodStore};
    pub use crate::error::{ApiError, ApiResult};
}
