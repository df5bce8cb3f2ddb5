//! Quarry main entry point
//!
//! Command-line interface for the Quarry crawler and search engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use quarry::config::{load_config_with_hash, Config};
use quarry::crawler::crawl;
use quarry::index::{IdfMethod, Indexer};
use quarry::search::{SearchHit, Searcher, TermStatistics};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quarry: a polite single-domain crawler and search engine
///
/// Quarry crawls one website while respecting robots.txt and rate limits,
/// checkpoints its progress so interrupted runs can resume, and builds a
/// persistent TF-IDF index over the extracted records for ranked search.
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version = "0.1.0")]
#[command(about = "A polite single-domain crawler and search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the configured domain, resuming a previous run if one exists
    Crawl {
        /// Start a fresh crawl, ignoring the saved queue
        #[arg(long)]
        fresh: bool,
    },

    /// Build the search index, or load it if it already exists
    Index {
        /// Rebuild from the records file even if index artifacts exist
        #[arg(long)]
        rebuild: bool,
    },

    /// Run a ranked search against the built index
    Search {
        /// Free-text query
        query: String,

        /// IDF formula to score with
        #[arg(long, value_enum, default_value_t = IdfMethod::Classic)]
        method: IdfMethod,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        top_k: usize,

        /// Metadata filter as field=value, repeatable; all must match
        #[arg(long, value_name = "FIELD=VALUE")]
        filter: Vec<String>,
    },

    /// Run a query under both IDF formulas and show the rankings side by side
    Compare {
        query: String,

        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },

    /// Show index statistics for a single term
    Term { term: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match cli.command {
        Command::Crawl { fresh } => handle_crawl(config, fresh).await,
        Command::Index { rebuild } => handle_index(&config, rebuild),
        Command::Search {
            query,
            method,
            top_k,
            filter,
        } => handle_search(&config, &query, method, top_k, &filter),
        Command::Compare { query, top_k } => handle_compare(&config, &query, top_k),
        Command::Term { term } => handle_term(&config, &term),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quarry=info,warn"),
            1 => EnvFilter::new("quarry=debug,info"),
            2 => EnvFilter::new("quarry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if interrupted run exists)");
    }

    tracing::info!(
        "Seed: {}, page limit: {}",
        config.crawl.seed_url,
        config.crawl.max_pages
    );

    let summary = crawl(config, fresh).await?;
    println!(
        "Crawl finished: {} pages fetched, {} visited total, {} still queued",
        summary.pages_fetched, summary.visited_total, summary.frontier_remaining
    );
    Ok(())
}

/// Handles the index subcommand
fn handle_index(config: &Config, rebuild: bool) -> anyhow::Result<()> {
    let snapshot = build_indexer(config).run(rebuild)?;

    println!("Index ready:");
    println!("  Documents: {}", snapshot.total_docs);
    println!("  Unique terms: {}", snapshot.vocabulary_size());
    println!("  Indexed fields: {}", snapshot.indexed_fields.join(", "));
    Ok(())
}

/// Handles the search subcommand
fn handle_search(
    config: &Config,
    query: &str,
    method: IdfMethod,
    top_k: usize,
    raw_filters: &[String],
) -> anyhow::Result<()> {
    let filters = parse_filters(raw_filters)?;
    let searcher = open_searcher(config)?;

    let hits = if filters.is_empty() {
        searcher.search(query, method, top_k)
    } else {
        searcher.search_with_filter(query, &filters, method, top_k)
    };

    println!("Query: {:?} ({} IDF)", query, method);
    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for (rank, hit) in hits.iter().enumerate() {
        print_hit(rank + 1, hit);
    }
    Ok(())
}

/// Handles the compare subcommand
fn handle_compare(config: &Config, query: &str, top_k: usize) -> anyhow::Result<()> {
    let searcher = open_searcher(config)?;
    let comparison = searcher.compare_idf_methods(query, top_k);

    println!("Query: {:?}\n", query);
    println!("=== Classic IDF: ln(N/df) ===");
    for (rank, hit) in comparison.classic.iter().enumerate() {
        print_hit(rank + 1, hit);
    }
    println!("\n=== Smooth IDF: ln((N+1)/(df+1)) + 1 ===");
    for (rank, hit) in comparison.smooth.iter().enumerate() {
        print_hit(rank + 1, hit);
    }
    Ok(())
}

/// Handles the term subcommand
fn handle_term(config: &Config, term: &str) -> anyhow::Result<()> {
    let searcher = open_searcher(config)?;

    match searcher.term_statistics(term) {
        TermStatistics::Invalid => {
            println!("'{}' yields no indexable term", term);
        }
        TermStatistics::NotFound { term } => {
            println!("Term '{}' not found in index", term);
        }
        TermStatistics::Found(report) => {
            println!("Term: {}", report.term);
            println!(
                "  Document frequency: {} ({:.1}% of documents)",
                report.document_frequency, report.percentage_of_docs
            );
            println!("  Total occurrences: {}", report.total_occurrences);
            println!("  IDF (classic): {:.4}", report.idf_classic);
            println!("  IDF (smooth): {:.4}", report.idf_smooth);
        }
    }
    Ok(())
}

fn build_indexer(config: &Config) -> Indexer {
    Indexer::new(
        &config.output.records_path,
        &config.output.index_dir,
        config.index.fields.clone(),
    )
}

/// Loads or builds the index and wraps it in a searcher
fn open_searcher(config: &Config) -> anyhow::Result<Searcher> {
    let snapshot = build_indexer(config).run(false)?;
    Ok(Searcher::new(snapshot)?)
}

/// Parses repeated `field=value` filter arguments
fn parse_filters(raw: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut filters = HashMap::new();
    for entry in raw {
        let (field, value) = entry
            .split_once('=')
            .with_context(|| format!("invalid filter '{}', expected field=value", entry))?;
        filters.insert(field.trim().to_string(), value.trim().to_string());
    }
    Ok(filters)
}

/// Prints one ranked hit in the standard result layout
fn print_hit(rank: usize, hit: &SearchHit) {
    let field = |name: &str| hit.metadata.get(name).map(String::as_str).unwrap_or("");

    println!("{}. {} (score: {:.4})", rank, field("name"), hit.score);
    if !field("url").is_empty() {
        println!("   URL: {}", field("url"));
    }
    if !field("contry").is_empty() {
        println!("   Country: {}", field("contry"));
    }
    if !field("type").is_empty() {
        println!("   Type: {}", field("type"));
    }
    let description = field("description");
    if !description.is_empty() {
        let shown: String = description.chars().take(200).collect();
        if shown.len() < description.len() {
            println!("   {}...", shown);
        } else {
            println!("   {}", shown);
        }
    }
}
