//! Search command - run the engine and print ranked results

use crate::OutputFormat;
use anyhow::{Context, Result};
use foodsearch_core::config::{Config, FetchStrategy};
use foodsearch_engine::{InMemoryFoodStore, SearchEngine, SearchOptions, SearchReport, SearchResult};
use foodsearch_sources::SourcesConfig;
use foodsearch_telemetry::{metrics, Timer};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of the search command
pub struct SearchArgs {
    pub term: String,
    pub max: Option<usize>,
    pub concurrent: bool,
    pub offline: bool,
    pub local_file: Option<PathBuf>,
}

/// Run a search
pub async fn run(config: &Config, args: SearchArgs, format: OutputFormat) -> Result<()> {
    let mut options = SearchOptions::from(&config.schema.search);
    if args.concurrent {
        options.fetch_strategy = FetchStrategy::Concurrent;
    }
    let max_results = args.max.unwrap_or(options.max_results);

    let engine = build_engine(config, &args, options)?;
    tracing::debug!(?engine, "Engine ready");

    let timer = Timer::start("search.duration_ms");
    let report = engine.search_with_report(&args.term, max_results).await;
    timer.stop();

    record_metrics(&report);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.results)?);
        }
        OutputFormat::Text => print_text(&report),
    }

    Ok(())
}

fn build_engine(config: &Config, args: &SearchArgs, options: SearchOptions) -> Result<SearchEngine> {
    let mut sources = SourcesConfig::from_schema(&config.schema)?;
    // A local file replaces the configured store
    if args.local_file.is_some() {
        sources.local = None;
    }

    let mut engine = foodsearch_sources::build_engine(sources, options, !args.offline)
        .context("Failed to set up search sources")?;

    if let Some(path) = &args.local_file {
        let store = InMemoryFoodStore::from_json_file(path)
            .with_context(|| format!("Failed to load local foods from {}", path.display()))?;
        engine = engine.with_local(Arc::new(store));
    }

    Ok(engine)
}

#[allow(clippy::cast_possible_truncation)]
fn record_metrics(report: &SearchReport) {
    let registry = metrics();
    registry.increment("search.requests");
    registry.increment_by("search.external_fetched", report.external_fetched as u64);
    registry.increment_by("search.local_fetched", report.local_fetched as u64);
    registry.increment_by("search.duplicates_dropped", report.duplicates_dropped as u64);
    registry.increment_by("source.failures", report.failed_sources.len() as u64);
    registry.gauge("search.last_result_count", report.results.len() as u64);
}

fn print_text(report: &SearchReport) {
    for source in &report.failed_sources {
        eprintln!("{} {} unavailable, results may be incomplete", "warning:".yellow().bold(), source);
    }

    if report.results.is_empty() {
        println!("No results for \"{}\"", report.term);
        return;
    }

    println!();
    println!("  {} {}", "Results for".bold(), format!("\"{}\"", report.term).cyan());
    println!();

    for (rank, result) in report.results.iter().enumerate() {
        print_result(rank + 1, result);
    }

    println!();
    println!(
        "  {}",
        format!(
            "{} external, {} local, {} duplicates dropped",
            report.external_kept, report.local_fetched, report.duplicates_dropped
        )
        .dimmed()
    );
}

fn print_result(rank: usize, result: &SearchResult) {
    let score = format!("{:>4}", result.score);
    let score = if result.score > 0 {
        score.green().to_string()
    } else {
        score.red().to_string()
    };
    let brand = result
        .brand
        .as_deref()
        .map(|brand| format!(" ({brand})"))
        .unwrap_or_default();
    let source = format!("[{}]", result.source);

    println!(
        "  {:>3}. {}  {}{}  {}",
        rank,
        score,
        result.name.bold(),
        brand.dimmed(),
        source.dimmed()
    );

    let breakdown = result.score_breakdown;
    println!(
        "       completeness {:>3}  quality {:>3}  relevance {:>4}  simplicity {:>3}  serving {} {}",
        breakdown.data_completeness,
        breakdown.quality,
        breakdown.name_relevance,
        breakdown.simplicity,
        result.default_serving.quantity,
        result.default_serving.unit
    );
}
