//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve listing pages and exercise the full
//! crawl cycle end-to-end. Variant resolution runs against a scripted
//! session double injected into the orchestrator; only the real browser
//! backend is left to its own live tests.

use pricewalk::config::{Config, OutputConfig, SiteConfig, UserAgentConfig, VariantConfig};
use pricewalk::session::{ControlSession, OptionEntry, SessionError};
use pricewalk::{scrape, ScrapeError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the given mock server
fn create_test_config(base_url: &str, csv_path: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            listing_path: "listing".to_string(),
            page_param: "page".to_string(),
        },
        user_agent: UserAgentConfig {
            scraper_name: "TestScraper".to_string(),
            scraper_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            csv_path: csv_path.to_string(),
        },
        variants: VariantConfig::default(),
    }
}

/// Renders one product thumbnail
fn thumbnail(n: u32) -> String {
    format!(
        r#"<div class="thumbnail">
            <a class="title" href="/product/{n}" title="Product {n}">Product {n}</a>
            <p class="description">Description {n}</p>
            <h4 class="price">${n}.99</h4>
            <div class="ratings">
                <p class="review-count">{n} reviews</p>
                <p data-rating="4"></p>
            </div>
        </div>"#,
    )
}

/// Renders a listing page body with the given thumbnails and an optional
/// pagination control
fn listing_page(thumbnails: &[u32], last_page: Option<u32>) -> String {
    let items: String = thumbnails.iter().map(|n| thumbnail(*n)).collect();
    let pagination = match last_page {
        Some(last) => {
            let entries: String = (1..=last).map(|p| format!("<li>{}</li>", p)).collect();
            format!(r#"<ul class="pagination">{}<li>&rsaquo;</li></ul>"#, entries)
        }
        None => String::new(),
    };
    format!("<html><body>{}{}</body></html>", items, pagination)
}

#[tokio::test]
async fn test_two_page_crawl_preserves_order() {
    let mock_server = MockServer::start().await;

    // Page 2 mock is mounted first: the first matching mock wins, and the
    // plain-path mock below would otherwise swallow the ?page=2 request.
    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[4, 5], Some(2))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2, 3], Some(2))),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let records = scrape::crawl(&config).await.unwrap();

    assert_eq!(records.len(), 5);
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Product 1", "Product 2", "Product 3", "Product 4", "Product 5"]
    );

    // Field parsing went through the real extraction path
    assert_eq!(records[0].price, 1.99);
    assert_eq!(records[0].num_of_reviews, 1);
    assert_eq!(records[0].rating, 4);
    assert_eq!(records[0].variant_prices, None);
}

#[tokio::test]
async fn test_single_page_site_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let records = scrape::crawl(&config).await.unwrap();

    assert_eq!(records.len(), 2);
    // The .expect(1) above verifies no second page was requested
}

#[tokio::test]
async fn test_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2, 3], None)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let first = scrape::crawl(&config).await.unwrap();
    let second = scrape::crawl(&config).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_selector_aborts_without_csv_output() {
    let mock_server = MockServer::start().await;

    // Second thumbnail has no price node
    let broken = listing_page(&[1, 2], None).replace(r#"<h4 class="price">$2.99</h4>"#, "");
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(broken))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("products.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let err = scrape::run(&config).await.unwrap_err();
    assert!(matches!(err, ScrapeError::SelectorMiss { selector } if selector == ".price"));

    // Fail-fast: nothing was flushed to the sink
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_pagination_format_error_aborts_before_page_loop() {
    let mock_server = MockServer::start().await;

    let body = format!(
        r#"<html><body>{}<ul class="pagination"><li>1</li><li>???</li><li>next</li></ul></body></html>"#,
        thumbnail(1)
    );
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let err = scrape::crawl(&config).await.unwrap_err();
    assert!(matches!(err, ScrapeError::PaginationFormat { text } if text == "???"));
}

#[tokio::test]
async fn test_http_error_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let err = scrape::crawl(&config).await.unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_failing_second_page_aborts_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2, 3], Some(2))),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let err = scrape::crawl(&config).await.unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_run_writes_csv_after_full_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[3], Some(2))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2], Some(2))))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("products.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let outcome = scrape::run(&config).await.unwrap();
    assert_eq!(outcome.records, 3);
    assert!(outcome.duration_seconds() >= 0);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "title,description,price,rating,num_of_reviews");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Product 1,"));
    assert!(lines[2].starts_with("Product 2,"));
    assert!(lines[3].starts_with("Product 3,"));
}

/// Session double answering with a fixed option set and per-option prices,
/// recording every detail page it is asked to visit
struct CatalogSession {
    navigated: Arc<Mutex<Vec<String>>>,
    selected: Option<String>,
    fail_after_visits: Option<usize>,
}

impl CatalogSession {
    fn new(navigated: Arc<Mutex<Vec<String>>>) -> Self {
        CatalogSession {
            navigated,
            selected: None,
            fail_after_visits: None,
        }
    }

    fn failing_after(navigated: Arc<Mutex<Vec<String>>>, visits: usize) -> Self {
        CatalogSession {
            navigated,
            selected: None,
            fail_after_visits: Some(visits),
        }
    }
}

#[async_trait::async_trait]
impl ControlSession for CatalogSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let mut visits = self.navigated.lock().unwrap();
        if let Some(limit) = self.fail_after_visits {
            if visits.len() >= limit {
                return Err(SessionError::Navigation {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                });
            }
        }
        visits.push(url.to_string());
        Ok(())
    }

    async fn find_options(&mut self, _control: &str) -> Result<Vec<OptionEntry>, SessionError> {
        Ok(vec![
            OptionEntry {
                value: "Black".to_string(),
                disabled: false,
            },
            OptionEntry {
                value: "Silver".to_string(),
                disabled: false,
            },
            OptionEntry {
                value: "Gold".to_string(),
                disabled: true,
            },
        ])
    }

    async fn select_option(&mut self, _control: &str, value: &str) -> Result<(), SessionError> {
        self.selected = Some(value.to_string());
        Ok(())
    }

    async fn text_of(&mut self, selector: &str) -> Result<String, SessionError> {
        match self.selected.as_deref() {
            Some("Black") => Ok("$94.99".to_string()),
            Some("Silver") => Ok("$99.99".to_string()),
            _ => Err(SessionError::MissingNode {
                selector: selector.to_string(),
            }),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_orchestrator_attaches_variant_prices_to_every_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[3], Some(2))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2], Some(2))))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.variants.enabled = true;

    let client = scrape::build_http_client(&config.user_agent).unwrap();
    let navigated = Arc::new(Mutex::new(Vec::new()));
    let session = CatalogSession::new(navigated.clone());

    let mut orchestrator =
        scrape::Orchestrator::new(&config, client, Some(Box::new(session))).unwrap();
    let result = orchestrator.run().await;
    orchestrator.shutdown().await;
    let records = result.unwrap();

    // Enabled options resolve to prices on every record; the disabled
    // option never appears in the mapping.
    let mut expected = BTreeMap::new();
    expected.insert("Black".to_string(), 94.99);
    expected.insert("Silver".to_string(), 99.99);

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.variant_prices.as_ref(), Some(&expected));
    }

    // One detail-page visit per record, in record order, resolved against
    // the site's base URL
    let base = mock_server.uri();
    let visits = navigated.lock().unwrap();
    assert_eq!(
        *visits,
        vec![
            format!("{base}/product/1"),
            format!("{base}/product/2"),
            format!("{base}/product/3"),
        ]
    );
}

#[tokio::test]
async fn test_variant_failure_mid_page_aborts_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2, 3], None)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.variants.enabled = true;

    let client = scrape::build_http_client(&config.user_agent).unwrap();
    let navigated = Arc::new(Mutex::new(Vec::new()));
    let session = CatalogSession::failing_after(navigated.clone(), 1);

    let mut orchestrator =
        scrape::Orchestrator::new(&config, client, Some(Box::new(session))).unwrap();
    let result = orchestrator.run().await;
    orchestrator.shutdown().await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::VariantResolution {
            ref url,
            source: SessionError::Navigation { .. },
        } if url.ends_with("/product/2")
    ));

    // The first record's detail page was visited; nothing past the failure
    assert_eq!(navigated.lock().unwrap().len(), 1);
}
