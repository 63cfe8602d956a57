//! Open Food Facts search
//!
//! Uses the full-text `cgi/search.pl` endpoint, which accepts free-text
//! terms. Only the fields the engine reads are requested.

use crate::client::SourceClient;
use crate::config::ExternalSettings;
use crate::error::ApiResult;
use async_trait::async_trait;
use foodsearch_engine::{ExternalFoodSource, FoodRecord, SearchError};
use reqwest::Url;
use serde::Deserialize;

const SEARCH_PATH: &str = "cgi/search.pl";

/// Product fields requested from the API
const FIELDS: &str = "code,product_name,brands,ingredients_text,nutrition_grades,nutriscore_grade,\
ecoscore_grade,nova_group,nutriments,serving_size,serving_quantity,serving_quantity_unit,\
image_front_small_url";

/// Search response envelope
///
/// Products stay raw so each one is decoded on its own.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Total matches; some mirrors send it as a string
    #[serde(default)]
    count: serde_json::Value,
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

/// External source backed by Open Food Facts
#[derive(Debug, Clone)]
pub struct OpenFoodFactsSource {
    client: SourceClient,
    country: Option<String>,
    page_size: u32,
}

impl OpenFoodFactsSource {
    /// Create the adapter
    pub fn new(settings: ExternalSettings) -> ApiResult<Self> {
        Ok(Self {
            client: SourceClient::with_config(settings.client)?,
            country: settings.country,
            page_size: settings.page_size,
        })
    }

    /// Search URL for a term
    pub fn search_url(&self, term: &str) -> ApiResult<Url> {
        let page_size = self.page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("search_terms", term),
            ("search_simple", "1"),
            ("action", "process"),
            ("json", "1"),
            ("page_size", page_size.as_str()),
            ("fields", FIELDS),
        ];
        if let Some(country) = &self.country {
            params.push(("countries_tags_en", country.as_str()));
        }

        self.client.url(SEARCH_PATH, &params)
    }
}

#[async_trait]
impl ExternalFoodSource for OpenFoodFactsSource {
    fn name(&self) -> &str {
        "open-food-facts"
    }

    async fn search(&self, term: &str) -> Result<Vec<FoodRecord>, SearchError> {
        let timeout = self.client.config().timeout;
        let url = self
            .search_url(term)
            .map_err(|e| e.into_search_error(self.name(), timeout))?;

        let response: SearchResponse = self
            .client
            .get_json(url)
            .await
            .map_err(|e| e.into_search_error(self.name(), timeout))?;

        let returned = response.products.len();
        let records = FoodRecord::decode_all(response.products, self.name());
        tracing::debug!(
            term,
            matched = %response.count,
            returned,
            decoded = records.len(),
            "Open Food Facts search"
        );
        Ok(records)
    }
}
