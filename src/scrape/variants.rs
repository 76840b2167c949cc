//! Per-variant price resolution through the interactive session
//!
//! Some prices only exist client-side: selecting an option in the detail
//! page's option control swaps the displayed price without a reload. This
//! module drives the shared browser session through that interaction, one
//! enabled option at a time, and records the price shown for each.

use crate::config::VariantConfig;
use crate::scrape::extractor::parse_price;
use crate::session::ControlSession;
use crate::{Result, ScrapeError};
use std::collections::BTreeMap;
use url::Url;

/// Resolves the per-variant prices of one product
///
/// Navigates the session to the product's detail page (resolved against the
/// site base URL), enumerates the option control's entries in document
/// order, and for every enabled entry activates it and reads the updated
/// price. The session is mutated; the caller guarantees exclusive use for
/// the duration.
///
/// Duplicate option values overwrite (last write wins). Any session failure
/// is fatal and aborts the whole crawl; see DESIGN.md for the policy choice.
///
/// # Arguments
///
/// * `detail_href` - The thumbnail's detail-page link (may be relative)
/// * `base_url` - Base URL the link is resolved against
/// * `config` - Variant selectors
/// * `session` - The shared controllable session
///
/// # Returns
///
/// A mapping from option value to resolved price; empty when the control
/// has no enabled options.
pub async fn resolve_variant_prices(
    detail_href: &str,
    base_url: &Url,
    config: &VariantConfig,
    session: &mut dyn ControlSession,
) -> Result<BTreeMap<String, f64>> {
    let detail_url = base_url.join(detail_href)?;
    let wrap = |source| ScrapeError::VariantResolution {
        url: detail_url.to_string(),
        source,
    };

    session.navigate(detail_url.as_str()).await.map_err(wrap)?;

    let options = session
        .find_options(&config.option_control)
        .await
        .map_err(wrap)?;

    let mut prices = BTreeMap::new();
    for option in options {
        if option.disabled {
            tracing::debug!(url = %detail_url, value = %option.value, "skipping disabled option");
            continue;
        }

        session
            .select_option(&config.option_control, &option.value)
            .await
            .map_err(wrap)?;

        let price_text = session
            .text_of(&config.price_selector)
            .await
            .map_err(wrap)?;
        let price = parse_price(&price_text)?;

        prices.insert(option.value, price);
    }

    Ok(prices)
}
