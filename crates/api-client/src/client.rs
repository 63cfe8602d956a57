//! Resilient HTTP client shared by the adapters

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ErrorContext};
use foodsearch_core::rate_limit::RateLimiter;
use foodsearch_core::retry::{retry_async, CircuitBreaker, CircuitBreakerConfig, CircuitState};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header for PostgREST gateways
const APIKEY_HEADER: &str = "apikey";

/// Longest rate-limit wait before giving up on a request
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(10);

/// Error bodies are cut to this many characters in messages
const MAX_ERROR_BODY: usize = 200;

/// HTTP client with built-in resilience patterns
///
/// This client wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - Circuit breaker to prevent cascading failures
/// - Rate limiting to stay inside the upstream's published budget
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct SourceClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
    rate_limiter: Arc<RateLimiter>,
}

impl SourceClient {
    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent contains invalid header characters"))?;
        default_headers.insert(USER_AGENT, user_agent);

        if let Some(ref key) = config.api_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|_| ApiError::config("API key contains invalid header characters"))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| ApiError::config("API key contains invalid header characters"))?;
            default_headers.insert(APIKEY_HEADER, apikey);
            default_headers.insert(AUTHORIZATION, bearer);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default()));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker,
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Build an absolute URL below the base URL with encoded query parameters
    pub fn url<I, K, V>(&self, path: &str, params: I) -> ApiResult<Url>
    where
        I: IntoIterator,
        I::Item: std::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse_with_params(&raw, params).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Perform a GET request with resilience patterns
    #[instrument(skip(self, url), fields(endpoint = %url.path()))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let ctx = ErrorContext {
            request_id: Uuid::new_v4().to_string(),
            endpoint: format!("{}{}", url.origin().ascii_serialization(), url.path()),
            method: "GET".to_string(),
        };

        if !self.circuit_breaker.can_execute() {
            warn!(request = %ctx, "Circuit breaker is open, rejecting request");
            return Err(ApiError::CircuitOpen);
        }

        self.acquire_rate_limit(&url, &ctx).await?;

        let outcome = retry_async(&self.config.retry, ApiError::is_retryable, || {
            self.execute_single_request(&ctx, url.clone())
        })
        .await;

        match outcome.result {
            Ok(value) => {
                self.circuit_breaker.record_success();
                debug!(
                    request = %ctx,
                    attempts = outcome.attempts,
                    elapsed_ms = outcome.total_duration.as_millis(),
                    "Request succeeded"
                );
                Ok(value)
            }
            Err(e) => {
                if !e.is_client_error() {
                    self.circuit_breaker.record_failure();
                }
                debug!(
                    request = %ctx,
                    attempts = outcome.attempts,
                    error = %e,
                    "Request failed"
                );
                Err(e)
            }
        }
    }

    /// Wait for a token when the bucket refills soon enough, fail otherwise
    async fn acquire_rate_limit(&self, url: &Url, ctx: &ErrorContext) -> ApiResult<()> {
        let key = url.host_str().unwrap_or("default");
        if self.rate_limiter.try_acquire(key) {
            return Ok(());
        }

        let wait = self.rate_limiter.time_until_available(key, 1);
        if wait > MAX_RATE_LIMIT_WAIT {
            warn!(request = %ctx, wait_ms = wait.as_millis(), "Rate limited");
            return Err(ApiError::RateLimited(wait));
        }

        debug!(request = %ctx, wait_ms = wait.as_millis(), "Waiting for rate limit");
        tokio::time::sleep(wait).await;

        if self.rate_limiter.try_acquire(key) {
            Ok(())
        } else {
            Err(ApiError::RateLimited(self.rate_limiter.time_until_available(key, 1)))
        }
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned>(
        &self,
        ctx: &ErrorContext,
        url: Url,
    ) -> ApiResult<T> {
        let start = Instant::now();
        let response = self
            .inner
            .get(url)
            .header(X_REQUEST_ID, &ctx.request_id)
            .send()
            .await?;
        debug!(
            request = %ctx,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Response received"
        );
        Self::handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

impl std::fmt::Debug for SourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceClient")
            .field("base_url", &self.config.base_url)
            .field("circuit", &self.circuit_breaker.state())
            .finish_non_exhaustive()
    }
}
