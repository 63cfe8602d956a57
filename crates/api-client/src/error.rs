//! Error types for the source adapters

use foodsearch_engine::SearchError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for adapter operations
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP adapter errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// Circuit breaker is open
    #[error("Circuit breaker is open - service temporarily unavailable")]
    CircuitOpen,

    /// Local request budget exhausted
    #[error("Rate limited - retry in {0:?}")]
    RateLimited(Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::CircuitOpen
            | Self::RateLimited(_)
            | Self::Config(_)
            | Self::Json(_)
            | Self::InvalidUrl(_) => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }

    /// Convert into the engine's error for the named source.
    ///
    /// `timeout` is the configured request timeout, reported as the elapsed
    /// time when the request timed out.
    pub fn into_search_error(self, source_name: &str, timeout: Duration) -> SearchError {
        match self {
            err if err.is_timeout() => SearchError::Timeout {
                source_name: source_name.to_string(),
                elapsed: timeout,
            },
            Self::Json(e) => SearchError::MalformedResponse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            },
            other => SearchError::unavailable(source_name, other.to_string()),
        }
    }
}

impl From<ApiError> for foodsearch_core::Error {
    fn from(err: ApiError) -> Self {
        use foodsearch_core::ErrorCode;

        let code = match &err {
            ApiError::Config(_) | ApiError::InvalidUrl(_) => ErrorCode::InvalidConfigValue,
            ApiError::Json(_) => ErrorCode::MalformedRecord,
            ApiError::CircuitOpen => ErrorCode::CircuitOpen,
            ApiError::RateLimited(_) => ErrorCode::RateLimited,
            ApiError::ApiResponse { .. } => ErrorCode::UpstreamRejected,
            ApiError::Request(e) if e.is_timeout() => ErrorCode::Timeout,
            ApiError::Request(_) => ErrorCode::SourceUnavailable,
        };
        foodsearch_core::Error::new(code, err.to_string()).with_source(err)
    }
}

/// Request description attached to log lines
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: String,
    /// URL without query string
    pub endpoint: String,
    /// HTTP method used
    pub method: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (request_id: {})", self.method, self.endpoint, self.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodsearch_engine::SearchErrorCode;

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::api_response(503, "unavailable").is_retryable());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(!ApiError::api_response(404, "not found").is_retryable());
        assert!(!ApiError::CircuitOpen.is_retryable());
        assert!(!ApiError::RateLimited(Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn test_client_error() {
        assert!(ApiError::api_response(401, "no key").is_client_error());
        assert!(!ApiError::api_response(500, "boom").is_client_error());
    }

    #[test]
    fn test_into_search_error() {
        let json_err = serde_json::from_str::<Vec<u8>>("<html>").unwrap_err();
        let err = ApiError::Json(json_err).into_search_error("open food facts", Duration::from_secs(10));
        assert_eq!(err.code(), SearchErrorCode::MalformedResponse);

        let err = ApiError::api_response(502, "bad gateway")
            .into_search_error("open food facts", Duration::from_secs(10));
        assert_eq!(err.code(), SearchErrorCode::SourceUnavailable);
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_into_core_error() {
        let core: foodsearch_core::Error = ApiError::config("bad timeout").into();
        assert_eq!(core.code, foodsearch_core::ErrorCode::InvalidConfigValue);

        let core: foodsearch_core::Error = ApiError::api_response(403, "forbidden").into();
        assert_eq!(core.code, foodsearch_core::ErrorCode::UpstreamRejected);
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext {
            request_id: "abc".to_string(),
            endpoint: "https://example.org/cgi/search.pl".to_string(),
            method: "GET".to_string(),
        };
        assert_eq!(ctx.to_string(), "GET https://example.org/cgi/search.pl (request_id: abc)");
    }
}
