//! Pagesweep main entry point
//!
//! This is the command-line interface for the Pagesweep document crawler.

use clap::Parser;
use pagesweep::config::{load_config_with_hash, Config};
use pagesweep::crawler::pipeline::{collect_item_ids, read_ids_file, run_items, run_listing};
use pagesweep::crawler::Crawler;
use pagesweep::output::{print_statistics, write_documents_markdown, write_links, RunStatistics};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Pagesweep: a paginated document crawler
///
/// Pagesweep walks a paginated listing, collects item links, then fetches
/// and extracts the text of every item page. Anti-bot challenge pages are
/// answered with a one-time cookie retry.
#[derive(Parser, Debug)]
#[command(name = "pagesweep")]
#[command(version)]
#[command(about = "A paginated document crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl listing pages and write links, skip item pages
    #[arg(long, conflicts_with = "items_only")]
    links_only: bool,

    /// Crawl item pages only, from configured ids and --ids-file
    #[arg(long, conflicts_with = "links_only")]
    items_only: bool,

    /// File with extra item ids, one per line
    #[arg(long, value_name = "PATH")]
    ids_file: Option<PathBuf>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesweep=info,warn"),
            1 => EnvFilter::new("pagesweep=debug,info"),
            2 => EnvFilter::new("pagesweep=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Pagesweep Dry Run ===\n");

    println!("Fetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Extra headers: {}", config.fetcher.headers.len());

    println!("\nChallenge:");
    println!("  Marker: {}", config.challenge.marker);
    println!("  Cookie: {}", config.challenge.cookie_name);
    println!("  Digest: {}", config.challenge.digest);

    println!("\nCrawler:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    match &config.listing {
        Some(listing) => {
            let pages = if listing.start_page <= listing.last_page {
                listing.last_page - listing.start_page + 1
            } else {
                0
            };
            println!("\nListing ({} pages):", pages);
            println!("  Template: {}", listing.url_template);
            println!("  Pages: {}..={}", listing.start_page, listing.last_page);
            println!("  Items per page: {}", listing.items_per_page);
        }
        None => println!("\nListing: not configured"),
    }

    println!("\nItems:");
    println!("  Template: {}", config.items.url_template);
    println!("  Configured ids: {}", config.items.ids.len());
    if let Some(pattern) = &config.items.id_pattern {
        println!("  Id pattern: {}", pattern);
    }

    println!("\nOutput:");
    println!("  Links: {}", config.output.links_path);
    println!("  Documents: {}", config.output.documents_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = Crawler::from_config(config)?;
    let start = Instant::now();
    let mut stats = RunStatistics::default();
    let mut links = Vec::new();

    if !cli.items_only {
        match &config.listing {
            Some(listing) => {
                let run = run_listing(&crawler, listing).await;
                write_links(&run.links, Path::new(&config.output.links_path))?;
                tracing::info!(
                    "Wrote {} links to {}",
                    run.links.len(),
                    config.output.links_path
                );
                stats.record_listing(&run);
                links = run.links;
            }
            None if cli.links_only => {
                return Err("--links-only needs a [listing] section in the configuration".into());
            }
            None => tracing::info!("No [listing] section, skipping listing crawl"),
        }
    }

    if !cli.links_only {
        let file_ids = match &cli.ids_file {
            Some(path) => read_ids_file(path)?,
            None => Vec::new(),
        };
        let ids = collect_item_ids(config, file_ids, &links)?;

        if ids.is_empty() {
            tracing::info!("No item ids to crawl");
        } else {
            let batch = run_items(&crawler, &config.items, &ids).await;
            write_documents_markdown(&batch.items, Path::new(&config.output.documents_path))?;
            tracing::info!(
                "Wrote {} documents to {}",
                batch.len(),
                config.output.documents_path
            );
            stats.record_items(&batch);
        }
    }

    stats.elapsed = start.elapsed();
    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}
