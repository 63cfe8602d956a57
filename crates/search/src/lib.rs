//! Food search ranking engine for FoodShare.
//!
//! Takes a free-text food query, pulls candidates from an external nutrition
//! database and a local document store, scores each candidate, merges and
//! deduplicates the two sets, and returns API-ready results.
//!
//! This crate provides:
//! - Levenshtein edit distance and similarity ratio
//! - Serving-size parsing with a partial-result fallback
//! - Multi-factor scoring (completeness, quality, name relevance, simplicity)
//! - A request-scoped orchestrator over pluggable sources
//!
//! # Example
//!
//! ```
//! use foodsearch_engine::{similarity_ratio, parse_serving_size};
//!
//! assert_eq!(similarity_ratio("apple", "apple"), 1.0);
//!
//! let serving = parse_serving_size(Some("250g"));
//! assert_eq!(serving.quantity, Some(250.0));
//! assert_eq!(serving.unit.as_deref(), Some("g"));
//! ```

mod candidate;
mod error;
mod format;
mod orchestrator;
mod scoring;
mod serving;
mod similarity;
mod source;
pub mod tables;
mod words;

pub use candidate::{FoodCandidate, FoodRecord, Grade, Nutrient, Nutriments, ProcessingLevel, Provenance};
pub use error::{Result, SearchError, SearchErrorCode};
pub use format::{format_result, DefaultServing, NutrientProjection, SearchResult};
pub use orchestrator::{SearchEngine, SearchOptions, SearchReport};
pub use scoring::{name_relevance, score, score_candidate, ScoreBreakdown, ScoredCandidate};
pub use serving::{parse_serving_size, ServingSizeInfo};
pub use similarity::{edit_distance, similarity_ratio};
pub use source::{ExternalFoodSource, InMemoryFoodStore, LocalFoodStore};
pub use words::{is_simple_clean_name, word_match_score};

pub use foodsearch_core::config::FetchStrategy;
