//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// `[search]` ranking options
    #[serde(default)]
    pub search: SearchConfig,

    /// `[external]` nutrition API
    #[serde(default)]
    pub external: ExternalSourceConfig,

    /// `[local]` document store
    #[serde(default)]
    pub local: LocalStoreConfig,

    /// `[logging]` output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(Error::config_invalid("search.max_results", "must be at least 1"));
        }

        validate_url("external.base_url", &self.external.base_url)?;
        if self.external.page_size == 0 {
            return Err(Error::config_invalid("external.page_size", "must be at least 1"));
        }
        if self.external.timeout_secs == 0 {
            return Err(Error::config_invalid("external.timeout_secs", "cannot be zero"));
        }
        if self.external.requests_per_minute == 0 {
            return Err(Error::config_invalid(
                "external.requests_per_minute",
                "must be at least 1",
            ));
        }

        if let Some(url) = &self.local.base_url {
            validate_url("local.base_url", url)?;
        }
        if self.local.table.trim().is_empty() {
            return Err(Error::config_invalid("local.table", "cannot be empty"));
        }

        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(Error::config_invalid(field, "cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::config_invalid(field, "must start with http:// or https://"));
    }
    Ok(())
}

/// How the two sources are fetched during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// External first; local only when external falls short of the target
    #[default]
    Sequential,
    /// Both sources at once; local is always fetched
    Concurrent,
}

/// Ranking behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Default number of results returned by a search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Source fetch strategy
    #[serde(default)]
    pub fetch_strategy: FetchStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            fetch_strategy: FetchStrategy::default(),
        }
    }
}

fn default_max_results() -> usize {
    25
}

/// External nutrition database (Open Food Facts compatible)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalSourceConfig {
    /// API root
    #[serde(default = "default_external_url")]
    pub base_url: String,

    /// Optional country tag used to filter results (e.g. `united-states`)
    #[serde(default)]
    pub country: Option<String>,

    /// Number of products requested per search
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// User agent sent upstream; the API asks clients to identify themselves
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Request budget for the search endpoint
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for ExternalSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_external_url(),
            country: None,
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

fn default_external_url() -> String {
    "https://world.openfoodfacts.org".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_user_agent() -> String {
    format!("foodsearch/{} (engineering@foodshare.club)", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_requests_per_minute() -> u32 {
    10
}

/// Local document store (PostgREST compatible)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalStoreConfig {
    /// REST root, e.g. `https://<project>.supabase.co/rest/v1`; disabled when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Table or collection holding food documents
    #[serde(default = "default_table")]
    pub table: String,

    /// Column matched exactly against the search term
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Environment variable holding the store API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            table: default_table(),
            name_column: default_name_column(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_table() -> String {
    "foods".to_string()
}

fn default_name_column() -> String {
    "name".to_string()
}

fn default_api_key_env() -> String {
    "FOODSEARCH_STORE_KEY".to_string()
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}
