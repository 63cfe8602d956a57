//! Search orchestration.
//!
//! One call runs a linear pipeline: fetch external, score, fetch local when
//! the external set falls short, score, merge, sort, truncate, format.
//! Source failures are logged and replaced by empty lists; a search never
//! fails.

use crate::candidate::{FoodCandidate, FoodRecord, Provenance};
use crate::error::Result;
use crate::format::{format_result, SearchResult};
use crate::scoring::{score_candidate, ScoredCandidate};
use crate::source::{ExternalFoodSource, LocalFoodStore};
use foodsearch_core::config::{FetchStrategy, SearchConfig};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Options applied to every search made by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Results returned when the caller does not ask for a count
    pub max_results: usize,
    /// Whether the local store is fetched alongside the external source
    pub fetch_strategy: FetchStrategy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 25,
            fetch_strategy: FetchStrategy::Sequential,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            fetch_strategy: config.fetch_strategy,
        }
    }
}

/// Results of one search plus what happened along the way.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub term: String,
    /// Records returned by the external source
    pub external_fetched: usize,
    /// External candidates that scored above zero
    pub external_kept: usize,
    pub local_queried: bool,
    pub local_fetched: usize,
    /// Local candidates dropped as duplicates of external ones
    pub duplicates_dropped: usize,
    /// Names of sources that failed and were treated as empty
    pub failed_sources: Vec<String>,
    pub results: Vec<SearchResult>,
}

/// Request-scoped search over an external source and a local store.
///
/// Either source may be absent; an absent source behaves like one that
/// returned nothing. The engine holds no per-search state and can be shared
/// across concurrent searches.
#[derive(Clone, Default)]
pub struct SearchEngine {
    external: Option<Arc<dyn ExternalFoodSource>>,
    local: Option<Arc<dyn LocalFoodStore>>,
    options: SearchOptions,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("external", &self.external.as_ref().map(|s| s.name().to_string()))
            .field("local", &self.local.as_ref().map(|s| s.name().to_string()))
            .field("options", &self.options)
            .finish()
    }
}

impl SearchEngine {
    /// Engine without sources.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            external: None,
            local: None,
            options,
        }
    }

    /// Attach the external source.
    pub fn with_external(mut self, source: Arc<dyn ExternalFoodSource>) -> Self {
        self.external = Some(source);
        self
    }

    /// Attach the local store.
    pub fn with_local(mut self, store: Arc<dyn LocalFoodStore>) -> Self {
        self.local = Some(store);
        self
    }

    /// Configured options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Search with the configured result count.
    pub async fn search(&self, term: &str) -> Vec<SearchResult> {
        self.search_with_report(term, self.options.max_results).await.results
    }

    /// Search returning at most `max_results` results.
    pub async fn search_with_limit(&self, term: &str, max_results: usize) -> Vec<SearchResult> {
        self.search_with_report(term, max_results).await.results
    }

    /// Search and report per-stage counts.
    #[instrument(skip(self))]
    pub async fn search_with_report(&self, term: &str, max_results: usize) -> SearchReport {
        let mut report = SearchReport {
            term: term.to_string(),
            ..SearchReport::default()
        };

        let query = term.trim();
        if query.is_empty() || max_results == 0 {
            debug!("Blank query or zero limit, skipping sources");
            return report;
        }

        let (external_records, prefetched_local) = match self.options.fetch_strategy {
            FetchStrategy::Sequential => (self.fetch_external(query, &mut report).await, None),
            FetchStrategy::Concurrent => {
                let (external, local) = tokio::join!(self.try_external(query), self.try_local(query));
                let external = self.recover_external(external, &mut report);
                (external, Some(local))
            }
        };

        report.external_fetched = external_records.len();
        debug!(count = report.external_fetched, "Scoring external candidates");
        let mut external = score_all(external_records, Provenance::External, query);
        external.sort_by(|a, b| b.total().cmp(&a.total()));
        report.external_kept = external.len();

        let local_records = match prefetched_local {
            Some(result) => self.recover_local(result, &mut report),
            None if external.len() < max_results => {
                self.recover_local(self.try_local(query).await, &mut report)
            }
            None => {
                debug!("External results meet the limit, skipping local store");
                Vec::new()
            }
        };

        report.local_fetched = local_records.len();
        let local = score_all(local_records, Provenance::Local, query);

        let (mut merged, duplicates) = merge(external, local);
        report.duplicates_dropped = duplicates;

        merged.sort_by(|a, b| b.total().cmp(&a.total()));
        merged.truncate(max_results);

        report.results = merged.iter().map(format_result).collect();

        info!(
            term = %query,
            external = report.external_kept,
            local = report.local_fetched,
            duplicates = report.duplicates_dropped,
            returned = report.results.len(),
            "Search complete"
        );

        report
    }

    async fn fetch_external(&self, query: &str, report: &mut SearchReport) -> Vec<FoodRecord> {
        let result = self.try_external(query).await;
        self.recover_external(result, report)
    }

    async fn try_external(&self, query: &str) -> Option<Result<Vec<FoodRecord>>> {
        match &self.external {
            Some(source) => Some(source.search(query).await),
            None => None,
        }
    }

    async fn try_local(&self, query: &str) -> Option<Result<Vec<FoodRecord>>> {
        match &self.local {
            Some(store) => Some(store.query_by_exact_name(query).await),
            None => None,
        }
    }

    fn recover_external(
        &self,
        result: Option<Result<Vec<FoodRecord>>>,
        report: &mut SearchReport,
    ) -> Vec<FoodRecord> {
        let name = self.external.as_ref().map_or("external", |s| s.name());
        recover(name, result, report)
    }

    fn recover_local(
        &self,
        result: Option<Result<Vec<FoodRecord>>>,
        report: &mut SearchReport,
    ) -> Vec<FoodRecord> {
        if result.is_some() {
            report.local_queried = true;
        }
        let name = self.local.as_ref().map_or("local", |s| s.name());
        recover(name, result, report)
    }
}

fn recover(
    source_name: &str,
    result: Option<Result<Vec<FoodRecord>>>,
    report: &mut SearchReport,
) -> Vec<FoodRecord> {
    match result {
        Some(Ok(records)) => records,
        Some(Err(err)) => {
            warn!(
                source = source_name,
                code = ?err.code(),
                error = %err,
                "Source failed, continuing without it"
            );
            report.failed_sources.push(source_name.to_string());
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Score records under one provenance, keeping their order.
///
/// Records without a display name are skipped.
fn score_all(records: Vec<FoodRecord>, provenance: Provenance, query: &str) -> Vec<ScoredCandidate> {
    let candidates = records
        .into_iter()
        .map(|record| FoodCandidate::new(record, provenance))
        .filter(|candidate| !candidate.name().is_empty());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candidates
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|candidate| score_candidate(candidate, query))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        candidates
            .filter_map(|candidate| score_candidate(candidate, query))
            .collect()
    }
}

/// Append local candidates that do not duplicate an external one.
///
/// A duplicate shares the trimmed, case-folded name or a non-empty
/// identifier with some external candidate. Returns the merged list and the
/// number of duplicates dropped.
fn merge(external: Vec<ScoredCandidate>, local: Vec<ScoredCandidate>) -> (Vec<ScoredCandidate>, usize) {
    let names: HashSet<String> = external
        .iter()
        .map(|scored| name_key(scored.candidate()))
        .collect();
    let ids: HashSet<String> = external
        .iter()
        .filter_map(|scored| id_key(scored.candidate()))
        .collect();

    let mut merged = external;
    let mut duplicates = 0;

    for scored in local {
        let same_name = names.contains(&name_key(scored.candidate()));
        let same_id = id_key(scored.candidate()).is_some_and(|id| ids.contains(&id));
        if same_name || same_id {
            debug!(name = scored.candidate().name(), "Dropping duplicate local candidate");
            duplicates += 1;
        } else {
            merged.push(scored);
        }
    }

    (merged, duplicates)
}

fn name_key(candidate: &FoodCandidate) -> String {
    candidate.name().trim().to_lowercase()
}

fn id_key(candidate: &FoodCandidate) -> Option<String> {
    candidate
        .identifier()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
