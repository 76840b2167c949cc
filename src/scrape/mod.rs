//! Scrape module: the crawl-and-extract pipeline
//!
//! This module contains the core scraping logic:
//! - HTTP fetching of listing pages
//! - Page-count resolution from the pagination control
//! - Product record extraction from thumbnails
//! - Variant price resolution through the browser session
//! - Overall crawl orchestration

pub mod extractor;
mod fetcher;
mod orchestrator;
mod pagination;
mod variants;

pub use extractor::{extract_listings, Listing};
pub use fetcher::{build_http_client, fetch_listing_page};
pub use orchestrator::Orchestrator;
pub use pagination::resolve_page_count;
pub use variants::resolve_variant_prices;

use crate::config::Config;
use crate::output::CsvSink;
use crate::record::ProductRecord;
use crate::session::{ChromiumSession, ControlSession};
use crate::Result;
use chrono::{DateTime, Utc};
use scraper::Selector;
use std::path::Path;

/// Parses a selector literal known valid at compile time
pub(crate) fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector is valid")
}

/// Summary of one completed scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Number of records written
    pub records: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeOutcome {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Runs a complete crawl and returns the ordered record sequence
///
/// This is the main entry point for collecting records without writing
/// them anywhere. It will:
/// 1. Build the HTTP client
/// 2. Launch the browser session when variant resolution is enabled
/// 3. Walk every listing page in order, extracting records
/// 4. Tear the session down, on failure paths included
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Vec<ProductRecord>)` - All records, page order then DOM order
/// * `Err(ScrapeError)` - The first failure encountered (fail-fast)
pub async fn crawl(config: &Config) -> Result<Vec<ProductRecord>> {
    let client = build_http_client(&config.user_agent)?;

    let session: Option<Box<dyn ControlSession>> = if config.variants.enabled {
        Some(Box::new(ChromiumSession::launch().await?))
    } else {
        None
    };

    let mut orchestrator = Orchestrator::new(config, client, session)?;
    let result = orchestrator.run().await;

    // Teardown must happen whether the crawl succeeded or not
    orchestrator.shutdown().await;

    result
}

/// Runs a complete scrape: crawl everything, then write the CSV file
///
/// The sink is invoked exactly once, after the whole collection has
/// succeeded; a failing crawl writes nothing.
pub async fn run(config: &Config) -> Result<ScrapeOutcome> {
    let started_at = Utc::now();

    let records = crawl(config).await?;

    let sink = CsvSink::new(
        Path::new(&config.output.csv_path),
        config.variants.enabled,
    );
    sink.write_all(&records)?;

    Ok(ScrapeOutcome {
        records: records.len(),
        started_at,
        finished_at: Utc::now(),
    })
}
