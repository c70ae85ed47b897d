//! Catalog search and end-to-end scan tests

use crate::support::album_page;
use chrono::NaiveDate;
use release_radar::config::{parse_config, UserAgentConfig};
use release_radar::crawler::{build_http_client, scan, Discovery, SearchWindow};
use release_radar::DiscoveryError;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/search/ajax-advanced/searching/albums";

fn discovery_for(endpoint: &str) -> Discovery {
    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    Discovery::new(client, endpoint, Duration::from_secs(2)).unwrap()
}

fn fixed_window() -> SearchWindow {
    SearchWindow::ending_on(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(), 30)
}

fn genres() -> Vec<String> {
    vec!["black".to_string(), "death".to_string()]
}

fn search_body(server_uri: &str) -> String {
    serde_json::json!({
        "iTotalRecords": 3,
        "aaData": [
            [
                "<a href=\"/bands/Ulver/1\">Ulver</a>",
                "<a href=\"/albums/1\">Liminal Animals</a>",
                "Full-length",
                "Experimental/Black Metal",
                "<a href=\"/labels/1\">House of Mythology</a>"
            ],
            [
                "Demonical",
                format!("<a href=\"{}/albums/2\">Mass Destruction</a>", server_uri),
                "EP",
                "Death Metal"
            ],
            ["Incomplete", "row"]
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_discover_sends_window_and_genres() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("genre", "black death"))
        .and(query_param("fromDate", "2026-03-01"))
        .and(query_param("toDate", "2026-03-31"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = discovery_for(&format!("{}{}", server.uri(), SEARCH_PATH));
    let candidates = discovery.discover_in(&genres(), fixed_window()).await;

    assert_eq!(candidates.len(), 2);

    assert_eq!(candidates[0].band, "Ulver");
    assert_eq!(candidates[0].album, "Liminal Animals");
    assert_eq!(candidates[0].genre, "Experimental/Black Metal");
    assert_eq!(candidates[0].label, "House of Mythology");
    assert_eq!(
        candidates[0].detail_url,
        Some(format!("{}/albums/1", server.uri()))
    );

    assert_eq!(candidates[1].band, "Demonical");
    assert_eq!(candidates[1].label, "");
    assert_eq!(
        candidates[1].detail_url,
        Some(format!("{}/albums/2", server.uri()))
    );
}

#[tokio::test]
async fn test_discover_connection_error_is_empty() {
    let discovery = discovery_for("http://127.0.0.1:1/search");

    let candidates = discovery.discover_in(&genres(), fixed_window()).await;
    assert!(candidates.is_empty());

    let result = discovery.try_discover(&genres(), fixed_window()).await;
    assert!(matches!(result, Err(DiscoveryError::Http { .. })));
}

#[tokio::test]
async fn test_discover_server_error_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let discovery = discovery_for(&format!("{}{}", server.uri(), SEARCH_PATH));

    assert!(discovery.discover(&genres(), 7).await.is_empty());

    let result = discovery.try_discover(&genres(), fixed_window()).await;
    assert!(matches!(
        result,
        Err(DiscoveryError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_discover_malformed_json_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let discovery = discovery_for(&format!("{}{}", server.uri(), SEARCH_PATH));

    assert!(discovery.discover_in(&genres(), fixed_window()).await.is_empty());

    let result = discovery.try_discover(&genres(), fixed_window()).await;
    assert!(matches!(result, Err(DiscoveryError::Parse(_))));
}

fn scan_config(endpoint: &str) -> String {
    format!(
        r#"
[search]
genres = ["black", "death"]
days-back = 14
endpoint = "{}"
query-timeout = 2

[enrichment]
concurrency = 2
request-timeout = 2
total-budget = 30
max-rate-limit-hits = 5
jitter-min-ms = 0
jitter-max-ms = 2
"#,
        endpoint
    )
}

#[tokio::test]
async fn test_scan_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("genre", "black death"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_body(&server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(album_page("May 8th, 2026")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = parse_config(&scan_config(&format!("{}{}", server.uri(), SEARCH_PATH))).unwrap();
    let result = scan(&config).await.unwrap();

    let records = &result.enrichment.records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].band, "Ulver");
    assert_eq!(records[0].release_date, "May 8th, 2026");
    assert_eq!(records[1].band, "Demonical");
    assert_eq!(records[1].release_date, "");

    let stats = &result.enrichment.stats;
    assert_eq!(stats.candidates, 2);
    assert_eq!(stats.dated, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.stop_reason, None);

    assert_eq!(
        (result.window.to - result.window.from).num_days(),
        14
    );
}

#[tokio::test]
async fn test_scan_with_unreachable_catalog_finds_nothing() {
    let config = parse_config(&scan_config("http://127.0.0.1:1/search")).unwrap();
    let result = scan(&config).await.unwrap();

    assert!(result.enrichment.records.is_empty());
    assert_eq!(result.enrichment.stats.candidates, 0);
}
