//! HTTP fetcher for listing pages
//!
//! Builds the HTTP client used for the whole run and fetches individual
//! listing pages. There is no retry logic anywhere: a transport failure or a
//! non-success status aborts the crawl immediately.

use crate::config::UserAgentConfig;
use crate::{Result, ScrapeError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> std::result::Result<Client, reqwest::Error> {
    // Format: ScraperName/Version
    let user_agent = format!("{}/{}", config.scraper_name, config.scraper_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one listing page and returns its HTML body
///
/// Page 1 is the bare listing URL; later pages carry the configured
/// page-number query parameter (e.g. `?page=2`).
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `listing_url` - Absolute URL of the product listing
/// * `page_param` - Name of the page-number query parameter
/// * `page` - Page number, or `None` for the first page
///
/// # Returns
///
/// * `Ok(String)` - The page body
/// * `Err(ScrapeError)` - Transport failure or non-success status
pub async fn fetch_listing_page(
    client: &Client,
    listing_url: &Url,
    page_param: &str,
    page: Option<u32>,
) -> Result<String> {
    let mut request = client.get(listing_url.clone());
    if let Some(page) = page {
        request = request.query(&[(page_param, page.to_string())]);
    }

    let response = request.send().await.map_err(|e| ScrapeError::Fetch {
        url: listing_url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus {
            url: listing_url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| ScrapeError::Fetch {
        url: listing_url.to_string(),
        source: e,
    })
}
