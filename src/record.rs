//! Product record type and output schema
//!
//! The CSV schema is declared explicitly as `(column name, accessor)` pairs
//! rather than derived from the struct layout, so the sink never needs to
//! introspect the record representation.

use std::collections::BTreeMap;

/// One product extracted from a listing-page thumbnail
///
/// Records are constructed once per thumbnail and never mutated afterwards;
/// the full crawl result is an ordered sequence of them (page order, then
/// within-page DOM order).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// Product title, non-empty
    pub title: String,

    /// Product description, verbatim (may be empty)
    pub description: String,

    /// Base listed price, always >= 0
    pub price: f64,

    /// Rating from the `data-rating` attribute
    pub rating: u8,

    /// Review count, leading token of the review-count text
    pub num_of_reviews: u32,

    /// Per-variant prices, present only when variant resolution is enabled;
    /// keys are the enabled option values of the detail page's option control
    pub variant_prices: Option<BTreeMap<String, f64>>,
}

/// Accessor producing one column's string value for a record
pub type FieldAccessor = fn(&ProductRecord) -> String;

/// Declared output schema: column name plus accessor, in header order
pub const SCHEMA: &[(&str, FieldAccessor)] = &[
    ("title", |r| r.title.clone()),
    ("description", |r| r.description.clone()),
    ("price", |r| r.price.to_string()),
    ("rating", |r| r.rating.to_string()),
    ("num_of_reviews", |r| r.num_of_reviews.to_string()),
];

/// Extra column appended when variant resolution is enabled
pub const VARIANTS_COLUMN: &str = "variant_prices";

impl ProductRecord {
    /// Returns a copy of this record with the given variant prices attached
    pub fn with_variants(mut self, prices: BTreeMap<String, f64>) -> Self {
        self.variant_prices = Some(prices);
        self
    }

    /// Encodes the variant-price mapping as a single CSV cell
    ///
    /// Format: `value=price` pairs joined with `;`, keys in sorted order
    /// (e.g. `Black=94.99;Silver=99.99`). Empty string when the record has
    /// no variant data or no enabled options.
    pub fn encode_variants(&self) -> String {
        match &self.variant_prices {
            None => String::new(),
            Some(prices) => prices
                .iter()
                .map(|(value, price)| format!("{}={}", value, price))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}
