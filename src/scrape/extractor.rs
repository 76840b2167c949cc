//! Product record extraction from listing-page thumbnails
//!
//! Each `.thumbnail` container yields exactly one record. Every field is
//! read through select-one semantics: the first matching descendant node,
//! with a hard failure when nothing matches. There are no defaults and no
//! silently skipped records; one bad thumbnail aborts the page.

use crate::record::ProductRecord;
use crate::scrape::css;
use crate::{Result, ScrapeError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// One listing entry: the extracted record plus the thumbnail's detail-page
/// link, kept for variant resolution
#[derive(Debug, Clone)]
pub struct Listing {
    pub record: ProductRecord,
    pub detail_href: String,
}

// Field selectors are fixed: the scraper targets one page structure.
// Parsed once and reused across every thumbnail on every page.
const TITLE_ANCHOR: &str = "a.title";
const RATING: &str = "p[data-rating]";
static THUMBNAIL: Lazy<Selector> = Lazy::new(|| css(".thumbnail"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| css(TITLE_ANCHOR));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| css(".description"));
static PRICE: Lazy<Selector> = Lazy::new(|| css(".price"));
static RATING_NODE: Lazy<Selector> = Lazy::new(|| css(RATING));
static REVIEW_COUNT: Lazy<Selector> = Lazy::new(|| css("div.ratings > .review-count"));

/// Extracts all product listings from one parsed page, in DOM order
pub fn extract_listings(page: &Html) -> Result<Vec<Listing>> {
    page.select(&THUMBNAIL).map(parse_thumbnail).collect()
}

/// Parses a single thumbnail container into a listing
fn parse_thumbnail(thumbnail: ElementRef) -> Result<Listing> {
    let anchor = select_one(thumbnail, &ANCHOR, TITLE_ANCHOR)?;
    let title = require_attr(anchor, TITLE_ANCHOR, "title")?;
    let detail_href = require_attr(anchor, TITLE_ANCHOR, "href")?;

    // Description is used verbatim, whitespace included
    let description = select_one(thumbnail, &DESCRIPTION, ".description")?
        .text()
        .collect::<String>();

    let price_text = select_one(thumbnail, &PRICE, ".price")?
        .text()
        .collect::<String>();
    let price = parse_price(&price_text)?;

    let rating_text = require_attr(
        select_one(thumbnail, &RATING_NODE, RATING)?,
        RATING,
        "data-rating",
    )?;
    let rating = rating_text
        .trim()
        .parse::<u8>()
        .map_err(|_| ScrapeError::FieldFormat {
            field: "rating",
            text: rating_text.clone(),
        })?;

    let reviews_text = select_one(thumbnail, &REVIEW_COUNT, "div.ratings > .review-count")?
        .text()
        .collect::<String>();
    let num_of_reviews = parse_review_count(&reviews_text)?;

    Ok(Listing {
        record: ProductRecord {
            title,
            description,
            price,
            rating,
            num_of_reviews,
            variant_prices: None,
        },
        detail_href,
    })
}

/// Selects the first descendant matching `selector`, failing when absent
///
/// `label` is the source text of the selector, carried for the error.
fn select_one<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    label: &'static str,
) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or_else(|| ScrapeError::SelectorMiss {
            selector: label.to_string(),
        })
}

/// Reads a required attribute off an element, failing when absent
fn require_attr(element: ElementRef, selector: &'static str, name: &'static str) -> Result<String> {
    element
        .value()
        .attr(name)
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::SelectorMiss {
            selector: format!("{}[{}]", selector, name),
        })
}

/// Parses a currency-prefixed price text (`"$49.99"` -> `49.99`)
///
/// Shared with variant resolution, which reads the same price node format
/// off the live detail page.
pub(crate) fn parse_price(text: &str) -> Result<f64> {
    let cleaned = text.trim().trim_start_matches('$');

    let price = cleaned
        .parse::<f64>()
        .map_err(|_| ScrapeError::FieldFormat {
            field: "price",
            text: text.trim().to_string(),
        })?;

    if price < 0.0 {
        return Err(ScrapeError::FieldFormat {
            field: "price",
            text: text.trim().to_string(),
        });
    }

    Ok(price)
}

/// Parses a review-count text (`"12 reviews"` -> `12`)
///
/// Only the first whitespace-delimited token is numeric; the trailing unit
/// word is discarded.
fn parse_review_count(text: &str) -> Result<u32> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::FieldFormat {
            field: "num_of_reviews",
            text: text.trim().to_string(),
        })
}
