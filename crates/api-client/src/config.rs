//! Adapter configuration
//!
//! Built from the `[external]` and `[local]` sections of the configuration
//! file, with environment overrides applied on top.

use crate::error::{ApiError, ApiResult};
use foodsearch_core::config::{ConfigSchema, ExternalSourceConfig, LocalStoreConfig};
use foodsearch_core::rate_limit::RateLimitConfig;
use foodsearch_core::retry::RetryConfig;
use std::time::Duration;

/// Overrides `[external] base_url`
pub const ENV_EXTERNAL_URL: &str = "FOODSEARCH_EXTERNAL_URL";
/// Overrides `[external] country`
pub const ENV_COUNTRY: &str = "FOODSEARCH_COUNTRY";
/// Overrides `[local] base_url`
pub const ENV_STORE_URL: &str = "FOODSEARCH_STORE_URL";
/// Overrides `[external] timeout_secs` for every adapter
pub const ENV_TIMEOUT_SECS: &str = "FOODSEARCH_TIMEOUT_SECS";

/// HTTP client configuration for one upstream
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root
    pub base_url: String,
    /// User agent header
    pub user_agent: String,
    /// Key sent as `apikey` and bearer token, if any
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let external = ExternalSourceConfig::default();
        Self {
            base_url: external.base_url,
            user_agent: external.user_agent,
            api_key: None,
            timeout: Duration::from_secs(external.timeout_secs),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::per_minute(external.requests_per_minute),
        }
    }
}

impl ClientConfig {
    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

/// External source settings
#[derive(Debug, Clone)]
pub struct ExternalSettings {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Country tag filter
    pub country: Option<String>,
    /// Products requested per search
    pub page_size: u32,
}

/// Local store settings
#[derive(Debug, Clone)]
pub struct LocalSettings {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Table holding food documents
    pub table: String,
    /// Column matched against the term
    pub name_column: String,
}

/// Settings for every adapter
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// Open Food Facts compatible search
    pub external: ExternalSettings,
    /// PostgREST store; `None` when no store URL is configured
    pub local: Option<LocalSettings>,
}

impl SourcesConfig {
    /// Build from the configuration file and the process environment
    pub fn from_schema(schema: &ConfigSchema) -> ApiResult<Self> {
        Self::from_schema_with(schema, |key| std::env::var(key).ok())
    }

    /// Build from the configuration file and an environment lookup
    pub fn from_schema_with(
        schema: &ConfigSchema,
        env: impl Fn(&str) -> Option<String>,
    ) -> ApiResult<Self> {
        let timeout = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ApiError::config(format!(
                        "{ENV_TIMEOUT_SECS} must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => Duration::from_secs(schema.external.timeout_secs),
        };

        let external = external_settings(&schema.external, &env, timeout);
        external.client.validate()?;

        let local = local_settings(&schema.local, &schema.external.user_agent, &env, timeout);
        if let Some(local) = &local {
            local.client.validate()?;
        }

        Ok(Self { external, local })
    }
}

fn external_settings(
    section: &ExternalSourceConfig,
    env: &impl Fn(&str) -> Option<String>,
    timeout: Duration,
) -> ExternalSettings {
    let base_url = env(ENV_EXTERNAL_URL).unwrap_or_else(|| section.base_url.clone());
    let country = env(ENV_COUNTRY)
        .or_else(|| section.country.clone())
        .filter(|country| !country.trim().is_empty());

    ExternalSettings {
        client: ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: section.user_agent.clone(),
            api_key: None,
            timeout,
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::strict(section.requests_per_minute, Duration::from_secs(60)),
        },
        country,
        page_size: section.page_size,
    }
}

fn local_settings(
    section: &LocalStoreConfig,
    user_agent: &str,
    env: &impl Fn(&str) -> Option<String>,
    timeout: Duration,
) -> Option<LocalSettings> {
    let base_url = env(ENV_STORE_URL).or_else(|| section.base_url.clone())?;

    Some(LocalSettings {
        client: ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
            api_key: env(&section.api_key_env).filter(|key| !key.is_empty()),
            timeout,
            retry: RetryConfig::quick(),
            rate_limit: RateLimitConfig::per_minute(600),
        },
        table: section.table.clone(),
        name_column: section.name_column.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = SourcesConfig::from_schema_with(&ConfigSchema::default(), lookup(&[])).unwrap();

        assert_eq!(config.external.client.base_url, "https://world.openfoodfacts.org");
        assert_eq!(config.external.client.timeout, Duration::from_secs(10));
        assert_eq!(config.external.client.rate_limit.max_requests, 10);
        assert_eq!(config.external.page_size, 50);
        assert!(config.external.country.is_none());
        assert!(config.local.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = SourcesConfig::from_schema_with(
            &ConfigSchema::default(),
            lookup(&[
                (ENV_EXTERNAL_URL, "http://localhost:8080/"),
                (ENV_COUNTRY, "france"),
                (ENV_STORE_URL, "https://store.example/rest/v1"),
                (ENV_TIMEOUT_SECS, "3"),
                ("FOODSEARCH_STORE_KEY", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(config.external.client.base_url, "http://localhost:8080");
        assert_eq!(config.external.country.as_deref(), Some("france"));
        assert_eq!(config.external.client.timeout, Duration::from_secs(3));

        let local = config.local.unwrap();
        assert_eq!(local.client.base_url, "https://store.example/rest/v1");
        assert_eq!(local.client.api_key.as_deref(), Some("secret"));
        assert_eq!(local.client.timeout, Duration::from_secs(3));
        assert_eq!(local.table, "foods");
    }

    #[test]
    fn test_invalid_timeout_override() {
        let err = SourcesConfig::from_schema_with(
            &ConfigSchema::default(),
            lookup(&[(ENV_TIMEOUT_SECS, "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_invalid_url_override() {
        let err = SourcesConfig::from_schema_with(
            &ConfigSchema::default(),
            lookup(&[(ENV_STORE_URL, "ftp://store")]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://test.example")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "https://test.example");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
    }
}
