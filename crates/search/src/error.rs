//! Error types for the search engine.
//!
//! None of these reach the caller of [`crate::SearchEngine::search`]: a
//! failing source is logged and replaced by an empty candidate list. They
//! exist so adapters can say *why* they failed.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by food sources.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The source could not be reached or refused the request
    #[error("{source_name} unavailable: {message}")]
    SourceUnavailable {
        /// Adapter name
        source_name: String,
        /// What went wrong
        message: String,
    },

    /// The source did not answer in time
    #[error("{source_name} timed out after {elapsed:?}")]
    Timeout {
        /// Adapter name
        source_name: String,
        /// Time spent before giving up
        elapsed: Duration,
    },

    /// The source answered with a body we could not read
    #[error("{source_name} returned malformed data: {message}")]
    MalformedResponse {
        /// Adapter name
        source_name: String,
        /// Decoder message
        message: String,
    },

    /// Loading a local store failed
    #[error("Local store error: {0}")]
    Store(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Shorthand for [`SearchError::SourceUnavailable`].
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::SourceUnavailable { .. } => SearchErrorCode::SourceUnavailable,
            SearchError::Timeout { .. } => SearchErrorCode::Timeout,
            SearchError::MalformedResponse { .. } => SearchErrorCode::MalformedResponse,
            SearchError::Store(_) => SearchErrorCode::Store,
            SearchError::Json(_) => SearchErrorCode::JsonParsing,
        }
    }
}

/// Error code for integration with foodsearch-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Source unreachable or refused
    SourceUnavailable = 11001,
    /// Source timed out
    Timeout = 11002,
    /// Source body unreadable
    MalformedResponse = 11003,
    /// Local store failure
    Store = 11004,
    /// JSON parsing error
    JsonParsing = 11005,
}

impl From<SearchError> for foodsearch_core::Error {
    fn from(err: SearchError) -> Self {
        use foodsearch_core::ErrorCode;

        let code = match err.code() {
            SearchErrorCode::SourceUnavailable => ErrorCode::SourceUnavailable,
            SearchErrorCode::Timeout => ErrorCode::Timeout,
            SearchErrorCode::MalformedResponse | SearchErrorCode::JsonParsing => {
                ErrorCode::MalformedRecord
            }
            SearchErrorCode::Store => ErrorCode::IoError,
        };
        foodsearch_core::Error::new(code, err.to_string()).with_source(err)
    }
}
