//! Explain command - show the score breakdown for one name

use crate::OutputFormat;
use anyhow::Result;
use foodsearch_engine::{score_candidate, FoodCandidate, FoodRecord, Provenance, ScoreBreakdown};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Explanation<'a> {
    name: &'a str,
    query: &'a str,
    source: Provenance,
    breakdown: ScoreBreakdown,
    total: i32,
    kept: bool,
}

/// Score `name` against `query` and print the components
pub fn run(name: &str, query: &str, local: bool, format: OutputFormat) -> Result<()> {
    let provenance = if local {
        Provenance::Local
    } else {
        Provenance::External
    };
    let candidate = FoodCandidate::new(FoodRecord::named(name), provenance);
    let breakdown = foodsearch_engine::score(&candidate, query);
    let kept = score_candidate(candidate, query).is_some();

    let explanation = Explanation {
        name,
        query,
        source: provenance,
        breakdown,
        total: breakdown.total(),
        kept,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&explanation)?),
        OutputFormat::Text => print_text(&explanation),
    }

    Ok(())
}

fn print_text(explanation: &Explanation<'_>) {
    let breakdown = explanation.breakdown;

    println!();
    println!(
        "  {} vs {} ({})",
        format!("\"{}\"", explanation.name).bold(),
        format!("\"{}\"", explanation.query).cyan(),
        explanation.source
    );
    println!();
    println!("  Data completeness  {:>4}", breakdown.data_completeness);
    println!("  Quality            {:>4}", breakdown.quality);
    println!("  Name relevance     {:>4}", breakdown.name_relevance);
    println!("  Simplicity         {:>4}", breakdown.simplicity);
    println!("  {}", "─────────────────────────".dimmed());
    println!("  Total              {:>4}", explanation.total.bold());
    println!();

    if explanation.kept {
        println!("  {}", "✓ Kept".green());
    } else {
        println!("  {}", "✗ Dropped (external candidates need a positive total)".red());
    }
}
