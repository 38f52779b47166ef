//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the tenders portal and run the
//! full crawl cycle end-to-end against real JSON files.

use tempfile::TempDir;
use ted_scraper::config::{Config, CrawlerConfig, OutputConfig, SessionCookies, SiteConfig};
use ted_scraper::crawler::{Coordinator, HttpFetcher, Record};
use ted_scraper::state::{Action, CrawlState, RunOutcome};
use ted_scraper::storage::{open_storage, JsonStorage, Storage};
use ted_scraper::ScraperError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            search_path: "/search".to_string(),
        },
        crawler: CrawlerConfig {
            request_delay_ms: 10, // Very short for testing
            request_timeout_secs: 5,
            ..CrawlerConfig::default()
        },
        output: OutputConfig {
            records_path: dir.path().join("output.json").display().to_string(),
            state_path: dir.path().join("state.json").display().to_string(),
        },
        cookies: Default::default(),
    }
}

fn create_coordinator(
    config: &Config,
    cookies: &SessionCookies,
) -> Coordinator<HttpFetcher, JsonStorage> {
    let fetcher = HttpFetcher::from_config(&config.crawler, cookies).expect("Failed to build client");
    Coordinator::new(config, fetcher, open_storage(&config.output))
        .expect("Failed to create coordinator")
}

fn listing_html(last_page: u32, notices: &[u32]) -> String {
    let cells: String = notices
        .iter()
        .map(|n| {
            format!(
                r#"<td class="nowrap"><a href="/notice/{}/TEXT?src=0">Notice {}</a></td>"#,
                n, n
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Search results</title></head><body>
        <table class="results"><tr>{}</tr></table>
        <div class="page-icon pagelast"><a href="/search?action=gp&amp;page={}">Last</a></div>
        </body></html>"#,
        cells, last_page
    )
}

fn data_html(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(k, v)| format!("<tr><td>{}</td><td>{}</td></tr>", k, v))
        .collect();
    format!(
        r##"<html><body>
        <ul class="tabs"><li><a href="#">Text</a></li><li><a class="selected" href="#">Data</a></li></ul>
        <table class="data"><tr><th colspan="2">Notice data</th></tr>{}</table>
        </body></html>"##,
        rows
    )
}

fn text_only_html() -> String {
    r##"<html><body><ul class="tabs"><li><a class="selected" href="#">Text</a></li></ul></body></html>"##
        .to_string()
}

async fn mount_listing_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts the unpaged listing; must come after the paged mocks
async fn mount_first_listing(server: &MockServer, last_page: u32) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(last_page, &[])))
        .mount(server)
        .await;
}

async fn mount_data_page(server: &MockServer, notice: u32, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/notice/{}/DATA", notice)))
        .and(query_param("tabId", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn notice_url(base_url: &str, notice: u32) -> String {
    format!("{}/notice/{}/TEXT?src=0", base_url, notice)
}

#[tokio::test]
async fn test_full_crawl_from_empty_state() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_listing_page(&mock_server, 1, listing_html(3, &[1])).await;
    mount_listing_page(&mock_server, 2, listing_html(3, &[2])).await;
    // The last page is never visited
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(3, &[9])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_first_listing(&mock_server, 3).await;

    mount_data_page(&mock_server, 1, text_only_html(), 1).await;
    mount_data_page(
        &mock_server,
        2,
        data_html(&[
            ("Title", "  Street   cleaning\n services "),
            ("CPV", "90611000 - Street-cleaning services90612000 - Street-sweeping services"),
            ("Country", "Ελλάδα"),
        ]),
        1,
    )
    .await;

    let config = create_test_config(&base_url, &dir);
    let mut coordinator = create_coordinator(&config, &SessionCookies::default());
    assert_eq!(coordinator.resume_point(), None);

    let outcome = coordinator.run(Action::Continue).await.expect("Crawl failed");
    assert_eq!(outcome, RunOutcome::Completed);

    // Verify the files on disk
    let storage = open_storage(&config.output);
    let records = storage.load_records().expect("Failed to load records");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(
        record.keys().collect::<Vec<_>>(),
        vec!["URL", "Title", "CPV", "Country"]
    );
    assert_eq!(record.url(), Some(notice_url(&base_url, 2).as_str()));
    assert_eq!(record.get("Title"), Some("Street cleaning services"));
    assert_eq!(
        record.get("CPV"),
        Some("90611000 - Street-cleaning services, 90612000 - Street-sweeping services")
    );

    let raw = std::fs::read_to_string(dir.path().join("output.json")).unwrap();
    assert!(raw.starts_with("[\n    {\n        \"URL\""));
    assert!(raw.contains("Ελλάδα"), "non-ASCII must be written as-is");

    let state = storage.load_state().expect("Failed to load state");
    assert_eq!(state.last_processed_page, Some(2));
}

#[tokio::test]
async fn test_continue_resumes_and_skips_collected_notices() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    // A previous run stopped on page 2 after collecting notices 3 and 4
    let storage = open_storage(&config.output);
    storage
        .save_records(&[
            Record::with_url(notice_url(&base_url, 3)),
            Record::with_url(notice_url(&base_url, 4)),
        ])
        .unwrap();
    storage.save_state(&CrawlState::at_page(2)).unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(4, &[1, 2])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_listing_page(&mock_server, 2, listing_html(4, &[3, 4, 5])).await;
    mount_listing_page(&mock_server, 3, listing_html(4, &[6])).await;
    mount_first_listing(&mock_server, 4).await;

    mount_data_page(&mock_server, 3, data_html(&[("Title", "seen")]), 0).await;
    mount_data_page(&mock_server, 4, data_html(&[("Title", "seen")]), 0).await;
    mount_data_page(&mock_server, 5, data_html(&[("Title", "five")]), 1).await;
    mount_data_page(&mock_server, 6, data_html(&[("Title", "six")]), 1).await;

    let mut coordinator = create_coordinator(&config, &SessionCookies::default());
    assert_eq!(coordinator.resume_point(), Some(2));

    let outcome = coordinator.run(Action::Continue).await.expect("Crawl failed");
    assert_eq!(outcome, RunOutcome::Completed);

    let records = storage.load_records().unwrap();
    let titles: Vec<_> = records.iter().filter_map(|r| r.get("Title")).collect();
    assert_eq!(records.len(), 4);
    assert_eq!(titles, vec!["five", "six"]);
    assert_eq!(storage.load_state().unwrap().last_processed_page, Some(3));
    assert_eq!(coordinator.summary().already_collected, 2);
}

#[tokio::test]
async fn test_update_stops_at_collected_notice() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let storage = open_storage(&config.output);
    storage
        .save_records(&[Record::with_url(notice_url(&base_url, 1))])
        .unwrap();
    storage.save_state(&CrawlState::at_page(40)).unwrap();

    // Newest notice first, then the frontier, then one that must not be reached
    mount_listing_page(&mock_server, 1, listing_html(50, &[7, 1, 8])).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(50, &[9])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_first_listing(&mock_server, 50).await;

    mount_data_page(&mock_server, 7, data_html(&[("Title", "newest")]), 1).await;
    mount_data_page(&mock_server, 8, data_html(&[("Title", "older")]), 0).await;

    let mut coordinator = create_coordinator(&config, &SessionCookies::default());
    let outcome = coordinator.run(Action::Update).await.expect("Crawl failed");

    assert_eq!(
        outcome,
        RunOutcome::CaughtUp {
            page: 1,
            url: notice_url(&base_url, 1),
        }
    );

    let records = storage.load_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("Title"), Some("newest"));
    assert_eq!(storage.load_state().unwrap().last_processed_page, Some(1));
}

#[tokio::test]
async fn test_session_cookies_are_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // Only a request carrying the session gets the listing
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("cookie", "JSESSIONID=abc123; lg_pref=en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(1, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir);
    let cookies = SessionCookies::new([("JSESSIONID", "abc123"), ("lg_pref", "en")]);
    let mut coordinator = create_coordinator(&config, &cookies);

    // last page 1 leaves nothing to visit
    let outcome = coordinator.run(Action::Continue).await.expect("Crawl failed");
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(coordinator.records().is_empty());
}

#[tokio::test]
async fn test_redirected_listing_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // Expired sessions are sent to the landing page
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir);
    let mut coordinator = create_coordinator(&config, &SessionCookies::default());
    let result = coordinator.run(Action::Continue).await;

    match result {
        Err(ScraperError::ListingUnavailable { url, reason }) => {
            assert_eq!(url, format!("{}/search", base_url));
            assert!(reason.contains("302"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected ListingUnavailable, got {:?}", other),
    }

    // The flush on the failure path still leaves a valid, empty record file
    let records = open_storage(&config.output).load_records().unwrap();
    assert!(records.is_empty());
}
