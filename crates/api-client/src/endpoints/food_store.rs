//! PostgREST document store
//!
//! Food documents live in one table; lookups filter a single column with
//! PostgREST's `eq` operator. The term is always double-quoted so commas,
//! dots and parentheses in food names are not read as filter syntax.

use crate::client::SourceClient;
use crate::config::LocalSettings;
use crate::error::ApiResult;
use async_trait::async_trait;
use foodsearch_engine::{FoodRecord, LocalFoodStore, SearchError};
use reqwest::Url;

/// Local store backed by a PostgREST endpoint (e.g. Supabase)
#[derive(Debug, Clone)]
pub struct PostgrestFoodStore {
    client: SourceClient,
    table: String,
    name_column: String,
}

impl PostgrestFoodStore {
    /// Create the adapter
    pub fn new(settings: LocalSettings) -> ApiResult<Self> {
        Ok(Self {
            client: SourceClient::with_config(settings.client)?,
            table: settings.table,
            name_column: settings.name_column,
        })
    }

    /// Lookup URL for a term
    pub fn lookup_url(&self, term: &str) -> ApiResult<Url> {
        let filter = format!("eq.{}", quote(term));
        self.client
            .url(&self.table, [(self.name_column.as_str(), filter.as_str())])
    }
}

/// Quote a filter value, escaping backslashes and double quotes
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[async_trait]
impl LocalFoodStore for PostgrestFoodStore {
    fn name(&self) -> &str {
        "postgrest"
    }

    async fn query_by_exact_name(&self, term: &str) -> Result<Vec<FoodRecord>, SearchError> {
        let timeout = self.client.config().timeout;
        let url = self
            .lookup_url(term)
            .map_err(|e| e.into_search_error(self.name(), timeout))?;

        let rows: Vec<serde_json::Value> = self
            .client
            .get_json(url)
            .await
            .map_err(|e| e.into_search_error(self.name(), timeout))?;

        let returned = rows.len();
        let records = FoodRecord::decode_all(rows, self.name());
        tracing::debug!(
            term,
            table = %self.table,
            returned,
            decoded = records.len(),
            "Store lookup"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn store() -> PostgrestFoodStore {
        PostgrestFoodStore::new(LocalSettings {
            client: ClientConfig::default()
                .with_base_url("https://project.supabase.co/rest/v1")
                .with_api_key("anon-key"),
            table: "foods".to_string(),
            name_column: "name".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_lookup_url() {
        let url = store().lookup_url("Chicken Breast").unwrap();
        assert_eq!(url.path(), "/rest/v1/foods");

        let (column, filter) = url.query_pairs().next().unwrap();
        assert_eq!(column, "name");
        assert_eq!(filter, "eq.\"Chicken Breast\"");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("rice, brown"), "\"rice, brown\"");
        assert_eq!(quote("12\" sub"), "\"12\\\" sub\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_store_rows_decode() {
        let rows = r#"[{"id": "7", "name": "Chicken Breast", "brand": null,
                        "nutrients": {"calories": 165, "protein": "31"},
                        "servingSize": "100g"}]"#;
        let records: Vec<FoodRecord> = serde_json::from_str(rows).unwrap();
        assert_eq!(records[0].id.as_deref(), Some("7"));
        assert_eq!(records[0].nutriments.get("protein"), Some(31.0));
    }

    #[test]
    fn test_bad_store_row_is_skipped() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"id": "7", "name": "Chicken Breast", "nutrients": {"calories": 165}},
                {"id": "8", "name": "Chicken Breast", "nutrients": []},
                null]"#,
        )
        .unwrap();
        let records = FoodRecord::decode_all(rows, "postgrest");
        let ids: Vec<_> = records.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["7", "8"]);
    }
}
