//! foodsearch - ranked food search from the command line
//!
//! Queries Open Food Facts and an optional local store, then prints the
//! engine's ranking with score breakdowns.

use clap::{Parser, Subcommand, ValueEnum};
use foodsearch_core::config::Config;
use foodsearch_core::exit_codes;
use foodsearch_engine::{SearchError, SearchErrorCode};
use foodsearch_sources::ApiError;
use foodsearch_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Ranked food search over Open Food Facts and a local food store
#[derive(Parser)]
#[command(name = "foodsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .foodsearch.toml or the user config dir)
    #[arg(short, long, global = true, env = "FOODSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print collected metrics as JSON on stderr when done
    #[arg(long, global = true)]
    metrics: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a food and print ranked results
    Search {
        /// Free-text query
        term: String,

        /// Maximum number of results (defaults to [search] max_results)
        #[arg(short, long)]
        max: Option<usize>,

        /// Fetch the local store alongside the external source
        #[arg(long)]
        concurrent: bool,

        /// Skip the external source
        #[arg(long)]
        offline: bool,

        /// Use a JSON array of food records as the local store
        #[arg(long, value_name = "PATH")]
        local_file: Option<PathBuf>,
    },

    /// Show how a food name scores against a query
    Explain {
        /// Food name to score
        name: String,

        /// Query to score against
        query: String,

        /// Score as a local-store candidate (never filtered)
        #[arg(long)]
        local: bool,
    },

    /// Parse a serving-size string
    Serving {
        /// Serving size text, e.g. "1 cup (240 ml)"
        raw: String,
    },

    /// Print the effective configuration
    Config {
        /// Print only the path of the loaded configuration file
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let logging = &config.schema.logging;
    foodsearch_telemetry::init_with_config(
        TelemetryConfig::new(&logging.level, logging.json).with_verbosity(cli.verbose),
    )?;

    let result = match cli.command {
        Commands::Search {
            term,
            max,
            concurrent,
            offline,
            local_file,
        } => {
            let args = commands::search::SearchArgs {
                term,
                max,
                concurrent,
                offline,
                local_file,
            };
            commands::search::run(&config, args, cli.format).await
        }
        Commands::Explain { name, query, local } => {
            commands::explain::run(&name, &query, local, cli.format)
        }
        Commands::Serving { raw } => commands::serving::run(&raw, cli.format),
        Commands::Config { path } => commands::config::run(&config, path),
    };

    if cli.metrics {
        eprintln!("{}", serde_json::to_string_pretty(&foodsearch_telemetry::metrics().export_json())?);
    }

    result
}

/// Map an error chain to a process exit code
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<foodsearch_core::Error>() {
        return exit_codes::for_code(e.code);
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return match e {
            ApiError::Config(_) | ApiError::InvalidUrl(_) => exit_codes::CONFIG_ERROR,
            _ => exit_codes::SOURCE_ERROR,
        };
    }
    if let Some(e) = err.downcast_ref::<SearchError>() {
        return match e.code() {
            SearchErrorCode::JsonParsing | SearchErrorCode::MalformedResponse => {
                exit_codes::DATA_ERROR
            }
            SearchErrorCode::Store => exit_codes::FAILURE,
            SearchErrorCode::SourceUnavailable | SearchErrorCode::Timeout => {
                exit_codes::SOURCE_ERROR
            }
        };
    }
    exit_codes::FAILURE
}
