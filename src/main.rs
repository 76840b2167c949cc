//! Pricewalk main entry point
//!
//! This is the command-line interface for the pricewalk product-listing scraper.

use clap::Parser;
use pricewalk::config::{load_config_with_hash, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pricewalk: a product-listing scraper
///
/// Pricewalk walks a paginated product listing, extracts one record per
/// product thumbnail, optionally resolves per-variant prices through a
/// headless browser, and writes everything to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "pricewalk")]
#[command(version = "1.0.0")]
#[command(about = "A product-listing scraper", long_about = None)]
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

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_scrape(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pricewalk=info,warn"),
            1 => EnvFilter::new("pricewalk=debug,info"),
            2 => EnvFilter::new("pricewalk=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Pricewalk Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing path: {}", config.site.listing_path);
    println!("  Page parameter: {}", config.site.page_param);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.scraper_name);
    println!("  Version: {}", config.user_agent.scraper_version);

    println!("\nOutput:");
    println!("  CSV file: {}", config.output.csv_path);

    println!("\nVariant resolution:");
    if config.variants.enabled {
        println!("  Enabled (requires a local Chromium install)");
        println!("  Option control: {}", config.variants.option_control);
        println!("  Price selector: {}", config.variants.price_selector);
    } else {
        println!("  Disabled");
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    if config.variants.enabled {
        tracing::info!("Variant price resolution enabled; launching browser session");
    }

    match pricewalk::scrape::run(config).await {
        Ok(outcome) => {
            tracing::info!(
                "Scrape completed: {} records in {}s (started {}, finished {})",
                outcome.records,
                outcome.duration_seconds(),
                outcome.started_at.to_rfc3339(),
                outcome.finished_at.to_rfc3339(),
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
