//! Source interfaces and the in-memory local store.
//!
//! Adapters return raw [`FoodRecord`]s; the orchestrator tags them with a
//! provenance, so an adapter cannot mislabel its own output.

use crate::candidate::FoodRecord;
use crate::error::{Result, SearchError};
use async_trait::async_trait;
use std::path::Path;

/// A remote nutrition database searched by free text.
#[async_trait]
pub trait ExternalFoodSource: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Search by free text. May return nothing.
    async fn search(&self, term: &str) -> Result<Vec<FoodRecord>>;
}

/// A document store queried by exact food name.
#[async_trait]
pub trait LocalFoodStore: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Records whose name equals `term`.
    async fn query_by_exact_name(&self, term: &str) -> Result<Vec<FoodRecord>>;
}

/// Local store backed by an owned list of records.
///
/// Name matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFoodStore {
    records: Vec<FoodRecord>,
}

impl InMemoryFoodStore {
    /// Store over the given records.
    pub fn new(records: Vec<FoodRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of records.
    ///
    /// Elements that are not records are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(Self::new(FoodRecord::decode_all(rows, "in-memory")))
    }

    /// Load a JSON array of records from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Store(format!("cannot read {}: {e}", path.display()))
        })?;
        let store = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), records = store.len(), "Loaded local food file");
        Ok(store)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LocalFoodStore for InMemoryFoodStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn query_by_exact_name(&self, term: &str) -> Result<Vec<FoodRecord>> {
        let term = term.trim().to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|record| {
                record
                    .name
                    .as_deref()
                    .or(record.product_name.as_deref())
                    .is_some_and(|name| name.trim().to_lowercase() == term)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FOODS: &str = r#"[
        {"id": "1", "name": "Chicken Breast", "nutrients": {"calories": 165}},
        {"id": "2", "name": "chicken breast ", "brand": "Farm Co"},
        {"id": "3", "name": "Chicken Thigh"}
    ]"#;

    #[tokio::test]
    async fn test_exact_name_ignores_case() {
        let store = InMemoryFoodStore::from_json_str(FOODS).unwrap();
        assert_eq!(store.len(), 3);

        let found = store.query_by_exact_name("CHICKEN BREAST").await.unwrap();
        let ids: Vec<_> = found.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_no_partial_matches() {
        let store = InMemoryFoodStore::from_json_str(FOODS).unwrap();
        assert!(store.query_by_exact_name("chicken").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_row_does_not_hide_good_ones() {
        let store = InMemoryFoodStore::from_json_str(
            r#"[
                {"id": "1", "name": "Chicken Breast", "nutrients": {"calories": 165}},
                {"id": "2", "name": "Chicken Breast", "nutrients": []},
                ["not", "a", "record"]
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);

        let found = store.query_by_exact_name("chicken breast").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].nutriments.get("calories"), Some(165.0));
        assert!(found[1].nutriments.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FOODS.as_bytes()).unwrap();

        let store = InMemoryFoodStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_from_json_file_errors() {
        let missing = InMemoryFoodStore::from_json_file("/no/such/foods.json").unwrap_err();
        assert!(matches!(missing, SearchError::Store(_)));

        let not_array = InMemoryFoodStore::from_json_str(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(not_array, SearchError::Json(_)));
    }
}
