//! Crawl orchestration
//!
//! Drives the whole pipeline: fetch page 1, resolve the page count, then
//! fetch and extract every page strictly in ascending order, resolving
//! variant prices per record when a session is attached. Fail-fast
//! throughout: the first error surfaces immediately and no partial result
//! is returned.

use crate::config::Config;
use crate::record::ProductRecord;
use crate::scrape::extractor::{extract_listings, Listing};
use crate::scrape::fetcher::fetch_listing_page;
use crate::scrape::pagination::resolve_page_count;
use crate::scrape::variants::resolve_variant_prices;
use crate::session::ControlSession;
use crate::Result;
use reqwest::Client;
use scraper::Html;
use url::Url;

/// Main crawl orchestrator
///
/// Owns the HTTP client and the optional interactive session for the run.
/// Pages are processed strictly sequentially; the session, when present, is
/// only ever used by one variant resolution at a time because the
/// orchestrator is its sole holder and never overlaps work.
pub struct Orchestrator<'a> {
    config: &'a Config,
    client: Client,
    session: Option<Box<dyn ControlSession>>,
    base_url: Url,
    listing_url: Url,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator for one crawl run
    ///
    /// `session` must be `Some` when variant resolution is enabled; it is
    /// acquired by the caller before any page work begins and released via
    /// [`Orchestrator::shutdown`] on every exit path.
    pub fn new(
        config: &'a Config,
        client: Client,
        session: Option<Box<dyn ControlSession>>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.site.base_url)?;
        let listing_url = base_url.join(&config.site.listing_path)?;

        Ok(Orchestrator {
            config,
            client,
            session,
            base_url,
            listing_url,
        })
    }

    /// Runs the crawl and returns the ordered record sequence
    ///
    /// Order is page order, then within-page DOM order, with no reordering
    /// or buffering in between.
    pub async fn run(&mut self) -> Result<Vec<ProductRecord>> {
        tracing::info!(url = %self.listing_url, "starting listing crawl");

        let body = fetch_listing_page(
            &self.client,
            &self.listing_url,
            &self.config.site.page_param,
            None,
        )
        .await?;

        // The Html tree is not kept across awaits; extract everything the
        // page has to offer, then drop it.
        let (page_count, first_listings) = {
            let document = Html::parse_document(&body);
            (resolve_page_count(&document)?, extract_listings(&document)?)
        };

        tracing::info!(pages = page_count, "resolved page count");

        let mut records = Vec::new();
        self.collect_page(first_listings, &mut records).await?;

        for page in 2..=page_count {
            tracing::info!(page, total = page_count, "scraping listing page");

            let body = fetch_listing_page(
                &self.client,
                &self.listing_url,
                &self.config.site.page_param,
                Some(page),
            )
            .await?;

            let listings = {
                let document = Html::parse_document(&body);
                extract_listings(&document)?
            };

            self.collect_page(listings, &mut records).await?;
        }

        tracing::info!(records = records.len(), "crawl complete");
        Ok(records)
    }

    /// Appends one page's listings to the accumulated records, resolving
    /// variant prices per record when a session is attached
    async fn collect_page(
        &mut self,
        listings: Vec<Listing>,
        records: &mut Vec<ProductRecord>,
    ) -> Result<()> {
        for listing in listings {
            let record = match self.session.as_mut() {
                Some(session) => {
                    let prices = resolve_variant_prices(
                        &listing.detail_href,
                        &self.base_url,
                        &self.config.variants,
                        session.as_mut(),
                    )
                    .await?;
                    listing.record.with_variants(prices)
                }
                None => listing.record,
            };
            records.push(record);
        }
        Ok(())
    }

    /// Releases the interactive session, if any
    ///
    /// Runs on success and failure paths alike; a close failure is logged
    /// rather than masking the crawl's own result.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.close().await {
                tracing::warn!("failed to close browser session: {}", e);
            }
        }
        self.session = None;
    }
}
