//! Pricewalk: a product-listing scraper
//!
//! This crate implements a scraper that walks a paginated product-listing
//! site, extracts structured product records from each page, optionally
//! resolves per-variant prices through a headless browser session, and
//! writes the collected records to a CSV file.

pub mod config;
pub mod output;
pub mod record;
pub mod scrape;
pub mod session;

use thiserror::Error;

/// Main error type for pricewalk operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Selector matched nothing: {selector}")]
    SelectorMiss { selector: String },

    #[error("Unparseable {field} text: {text:?}")]
    FieldFormat { field: &'static str, text: String },

    #[error("Pagination page count not parseable: {text:?}")]
    PaginationFormat { text: String },

    #[error("Variant resolution failed for {url}: {source}")]
    VariantResolution {
        url: String,
        source: session::SessionError,
    },

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for pricewalk operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::ProductRecord;
pub use session::{ControlSession, SessionError};
