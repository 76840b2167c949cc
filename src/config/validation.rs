use crate::config::types::{Config, OutputConfig, SiteConfig, UserAgentConfig, VariantConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_variant_config(&config.variants)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use HTTP or HTTPS, got '{}'",
            base.scheme()
        )));
    }

    if base.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot serve as a base for relative links",
            config.base_url
        )));
    }

    if config.listing_path.is_empty() {
        return Err(ConfigError::Validation(
            "listing-path cannot be empty".to_string(),
        ));
    }

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate scraper name: non-empty, alphanumeric + hyphens only
    if config.scraper_name.is_empty() {
        return Err(ConfigError::Validation(
            "scraper_name cannot be empty".to_string(),
        ));
    }

    if !config
        .scraper_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "scraper_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.scraper_name
        )));
    }

    if config.scraper_version.is_empty() {
        return Err(ConfigError::Validation(
            "scraper_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates variant resolution configuration
///
/// Selectors are checked up front so a typo fails at load time rather than
/// mid-crawl with a browser session open.
fn validate_variant_config(config: &VariantConfig) -> Result<(), ConfigError> {
    validate_selector("option-control", &config.option_control)?;
    validate_selector("price-selector", &config.price_selector)?;
    Ok(())
}

/// Validates that a string parses as a CSS selector
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            name
        )));
    }

    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", name, selector, e)))?;

    Ok(())
}
