use serde::Deserialize;

/// Main configuration structure for pricewalk
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub variants: VariantConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the site (detail-page links are resolved against this)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the product listing, relative to the base URL
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Name of the page-number query parameter
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "scraper-name")]
    pub scraper_name: String,

    /// Version of the scraper
    #[serde(rename = "scraper-version")]
    pub scraper_version: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV output file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

/// Variant price resolution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VariantConfig {
    /// Whether to resolve per-variant prices (requires a headless browser)
    #[serde(default)]
    pub enabled: bool,

    /// CSS selector of the detail page's option control
    #[serde(rename = "option-control", default = "default_option_control")]
    pub option_control: String,

    /// CSS selector of the detail page's displayed price node
    #[serde(rename = "price-selector", default = "default_price_selector")]
    pub price_selector: String,
}

impl Default for VariantConfig {
    fn default() -> Self {
        VariantConfig {
            enabled: false,
            option_control: default_option_control(),
            price_selector: default_price_selector(),
        }
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_option_control() -> String {
    "select.dropdown".to_string()
}

fn default_price_selector() -> String {
    ".price".to_string()
}
