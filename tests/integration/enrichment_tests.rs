//! Enrichment coordinator tests against mock album pages

use crate::support::{fast_fetcher, linked, mount_album, mount_status, unlinked};
use release_radar::crawler::{enrich, Coordinator, EnrichmentSettings};
use release_radar::StopReason;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(concurrency: usize, max_rate_limit_hits: usize) -> EnrichmentSettings {
    EnrichmentSettings {
        concurrency,
        per_fetch_timeout: Duration::from_secs(5),
        total_budget: Duration::from_secs(60),
        max_rate_limit_hits,
    }
}

#[tokio::test]
async fn test_mixed_linked_and_unlinked_candidates() {
    let server = MockServer::start().await;
    mount_album(&server, 0, "January 5th, 2026").await;
    mount_album(&server, 2, "February 13th, 2026").await;
    mount_album(&server, 4, "March 20th, 2026").await;

    let candidates = vec![
        linked(&server, 0),
        unlinked(1),
        linked(&server, 2),
        unlinked(3),
        linked(&server, 4),
    ];

    let records = enrich(
        &fast_fetcher(),
        candidates.clone(),
        3,
        Duration::from_secs(5),
        Duration::from_secs(60),
        5,
    )
    .await;

    assert_eq!(records.len(), 5);
    for (record, candidate) in records.iter().zip(&candidates) {
        assert_eq!(record.band, candidate.band);
        assert_eq!(record.album, candidate.album);
    }

    let dates: Vec<&str> = records.iter().map(|r| r.release_date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "January 5th, 2026",
            "",
            "February 13th, 2026",
            "",
            "March 20th, 2026"
        ]
    );
}

#[tokio::test]
async fn test_unlinked_candidates_dispatch_no_requests() {
    let server = MockServer::start().await;
    for index in [0, 3, 5] {
        mount_album(&server, index, &format!("Date {}", index)).await;
    }

    let candidates: Vec<_> = (0..6)
        .map(|i| {
            if [0, 3, 5].contains(&i) {
                linked(&server, i)
            } else {
                unlinked(i)
            }
        })
        .collect();

    let coordinator = Coordinator::new(fast_fetcher(), settings(3, 5));
    let outcome = coordinator.run(candidates).await;

    assert_eq!(outcome.records.len(), 6);
    assert_eq!(outcome.stats.without_link, 3);
    assert_eq!(outcome.stats.dated, 3);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 3);

    let mut paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["/albums/0", "/albums/3", "/albums/5"]);
}

#[tokio::test]
async fn test_concurrency_bounds_fetches_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::support::album_page("Bounded"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let candidates: Vec<_> = (0..6).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(fast_fetcher(), settings(2, 5));

    let started = Instant::now();
    let outcome = coordinator.run(candidates).await;
    let elapsed = started.elapsed();

    // Six fetches two at a time take at least three delay rounds
    assert!(
        elapsed >= Duration::from_millis(850),
        "finished in {:?}, more than 2 fetches ran at once",
        elapsed
    );
    assert_eq!(outcome.records.len(), 6);
    assert!(outcome.records.iter().all(|r| r.release_date == "Bounded"));
}

#[tokio::test]
async fn test_order_preserved_when_first_fetch_is_slowest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums/0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::support::album_page("Slow date"))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    for index in 1..4 {
        mount_album(&server, index, &format!("Date {}", index)).await;
    }

    let candidates: Vec<_> = (0..4).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(fast_fetcher(), settings(4, 5));
    let outcome = coordinator.run(candidates).await;

    let dates: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.release_date.as_str())
        .collect();
    assert_eq!(dates, vec!["Slow date", "Date 1", "Date 2", "Date 3"]);
    assert_eq!(outcome.stats.dated, 4);
}

#[tokio::test]
async fn test_rate_limit_breaker_truncates_output() {
    let server = MockServer::start().await;
    for index in 0..5 {
        mount_album(&server, index, &format!("Date {}", index)).await;
    }
    for index in 5..10 {
        mount_status(&server, index, 429).await;
    }

    let candidates: Vec<_> = (0..10).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(fast_fetcher(), settings(3, 5));
    let outcome = coordinator.run(candidates.clone()).await;

    assert!(
        outcome.records.len() <= 9,
        "expected at most 9 records, got {}",
        outcome.records.len()
    );
    assert_eq!(outcome.stats.stop_reason, Some(StopReason::RateLimited));
    assert_eq!(outcome.stats.rate_limited, 5);

    for (index, record) in outcome.records.iter().enumerate() {
        assert_eq!(record.band, candidates[index].band);
        if index < 5 {
            assert_eq!(record.release_date, format!("Date {}", index));
        } else {
            assert_eq!(record.release_date, "");
        }
    }
}

#[tokio::test]
async fn test_breaker_stops_once_threshold_observed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let candidates: Vec<_> = (0..8).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(fast_fetcher(), settings(1, 2));
    let outcome = coordinator.run(candidates).await;

    // The second 429 is observed no later than candidate 1
    assert!(outcome.records.len() <= 1);
    assert!(outcome.records.iter().all(|r| r.release_date.is_empty()));
    assert_eq!(outcome.stats.stop_reason, Some(StopReason::RateLimited));
    assert!(outcome.stats.dropped() >= 7);
    assert!(outcome.stats.rate_limited >= 2);
}

#[tokio::test]
async fn test_total_budget_truncates_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::support::album_page("Late"))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let candidates: Vec<_> = (0..6).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(
        fast_fetcher(),
        EnrichmentSettings {
            concurrency: 1,
            per_fetch_timeout: Duration::from_secs(5),
            total_budget: Duration::from_millis(1000),
            max_rate_limit_hits: 5,
        },
    );

    let started = Instant::now();
    let outcome = coordinator.run(candidates.clone()).await;

    assert!(
        outcome.records.len() <= 3,
        "expected at most 3 records, got {}",
        outcome.records.len()
    );
    assert_eq!(outcome.stats.stop_reason, Some(StopReason::BudgetExceeded));
    assert!(started.elapsed() < Duration::from_secs(2));

    for (record, candidate) in outcome.records.iter().zip(&candidates) {
        assert_eq!(record.band, candidate.band);
        assert_eq!(record.release_date, "Late");
    }
}

#[tokio::test]
async fn test_slow_fetch_times_out_as_empty_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/albums/0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::support::album_page("Too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_album(&server, 1, "On time").await;

    let coordinator = Coordinator::new(
        fast_fetcher(),
        EnrichmentSettings {
            concurrency: 2,
            per_fetch_timeout: Duration::from_millis(200),
            total_budget: Duration::from_secs(60),
            max_rate_limit_hits: 5,
        },
    );
    let outcome = coordinator
        .run(vec![linked(&server, 0), linked(&server, 1)])
        .await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].release_date, "");
    assert_eq!(outcome.records[1].release_date, "On time");
    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.stats.stop_reason, None);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_status(&server, 0, 500).await;
    mount_status(&server, 1, 404).await;
    mount_album(&server, 2, "April 1st, 2026").await;
    Mock::given(method("GET"))
        .and(path("/albums/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>No info</body></html>"))
        .mount(&server)
        .await;

    let candidates: Vec<_> = (0..4).map(|i| linked(&server, i)).collect();
    let coordinator = Coordinator::new(fast_fetcher(), settings(2, 5));
    let outcome = coordinator.run(candidates).await;

    let dates: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.release_date.as_str())
        .collect();
    assert_eq!(dates, vec!["", "", "April 1st, 2026", ""]);
    assert_eq!(outcome.stats.failed, 2);
    assert_eq!(outcome.stats.dated, 1);
    assert_eq!(outcome.stats.missing_date, 1);
    assert_eq!(outcome.stats.stop_reason, None);
}

#[tokio::test]
async fn test_runs_do_not_share_rate_limit_counter() {
    let server = MockServer::start().await;
    mount_status(&server, 0, 429).await;
    mount_album(&server, 1, "Fresh").await;

    let coordinator = Coordinator::new(fast_fetcher(), settings(1, 1));

    let first = coordinator.run(vec![linked(&server, 0)]).await;
    assert!(first.records.is_empty());
    assert_eq!(first.stats.stop_reason, Some(StopReason::RateLimited));
    assert_eq!(first.stats.rate_limited, 1);

    let second = coordinator.run(vec![linked(&server, 1)]).await;
    assert_eq!(second.records.len(), 1);
    assert_eq!(second.stats.rate_limited, 0);
    assert_eq!(second.records[0].release_date, "Fresh");
    assert_eq!(second.stats.stop_reason, None);
}
