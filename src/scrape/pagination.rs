//! Page-count resolution from the listing's pagination control
//!
//! The pagination control is a list of clickable page-number entries with a
//! "next" entry as the last element. The highest page number is therefore
//! the second-to-last entry, never the last one; reading the wrong entry
//! silently drops or duplicates pages.

use crate::scrape::css;
use crate::{Result, ScrapeError};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PAGINATION: Lazy<Selector> = Lazy::new(|| css(".pagination"));
static ENTRY: Lazy<Selector> = Lazy::new(|| css("li"));

/// Determines how many listing pages exist, from the first page
///
/// # Returns
///
/// * `Ok(1)` - The page has no pagination control (single-page site)
/// * `Ok(n)` - The second-to-last entry's text, parsed as the page count
/// * `Err(ScrapeError::PaginationFormat)` - The entry's text is not a number
///   (fatal for the whole crawl, no fallback)
pub fn resolve_page_count(first_page: &Html) -> Result<u32> {
    let pagination = match first_page.select(&PAGINATION).next() {
        Some(control) => control,
        None => return Ok(1),
    };

    let entries: Vec<_> = pagination.select(&ENTRY).collect();

    // Fewer than two entries means there is no numeric entry before the
    // "next" control; treat it as a malformed control.
    if entries.len() < 2 {
        return Err(ScrapeError::PaginationFormat {
            text: pagination.text().collect::<String>().trim().to_string(),
        });
    }

    let text = entries[entries.len() - 2]
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    text.parse::<u32>()
        .map_err(|_| ScrapeError::PaginationFormat { text })
}
