//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use sumi_sitemap::config::{Config, CrawlRunConfig};
use sumi_sitemap::crawler::{crawl, CrawlOutcome, Coordinator};
use sumi_sitemap::output::{CrawlEvent, EventSink, MemorySink, OutputResult};
use sumi_sitemap::state::RunState;
use sumi_sitemap::SitemapError;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short fetch timeout
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.fetch_timeout_ms = 2_000;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(
            format!("<html><body>{}</body></html>", body),
            "text/html; charset=utf-8",
        )
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn run_crawl(run: &CrawlRunConfig, config: &Config) -> (CrawlOutcome, Vec<CrawlEvent>) {
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let sink = MemorySink::new();
    let outcome = coordinator
        .run(run, &sink, CancellationToken::new())
        .await
        .expect("Run rejected");
    (outcome, sink.events())
}

fn locations(outcome: &CrawlOutcome) -> Vec<String> {
    outcome
        .results()
        .iter()
        .map(|r| r.location.clone())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<title>Home</title>
        <a href="/page1">Page 1</a>
        <a href="/page2">Page 2</a>
        <a href="https://external.invalid/elsewhere">External</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<title>Page 1</title><a href="/">Home</a><a href="/page2">Page 2</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<title>Page 2</title><a href="/page1">Page 1</a><a href="/page3">Page 3</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page3", "<title>Page 3</title>").await;

    let (outcome, events) =
        run_crawl(&CrawlRunConfig::new(base_url.clone()), &create_test_config()).await;

    assert_eq!(outcome.state(), RunState::Completed);

    let mut found = locations(&outcome);
    found.sort();
    assert_eq!(
        found,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            format!("{}/page3", base_url),
        ]
    );

    let page3 = outcome
        .results()
        .iter()
        .find(|r| r.location.ends_with("/page3"))
        .unwrap();
    assert_eq!(page3.depth, 2);
    assert_eq!(page3.title.as_deref(), Some("Page 3"));
    assert_eq!(page3.http_status, Some(200));

    // Event stream: start, url/progress per batch, then complete
    assert!(matches!(events.first(), Some(CrawlEvent::Start(_))));
    assert!(matches!(events.last(), Some(CrawlEvent::Complete(_))));
    let url_events = events
        .iter()
        .filter(|e| matches!(e, CrawlEvent::Url(_)))
        .count();
    assert_eq!(url_events, 4);

    match events.first() {
        Some(CrawlEvent::Start(start)) => assert_eq!(start.base_url, base_url),
        other => panic!("expected start event, got {:?}", other),
    }

    match events.last() {
        Some(CrawlEvent::Complete(summary)) => {
            assert_eq!(summary.total_pages, 4);
            assert_eq!(summary.base_url, base_url);
        }
        other => panic!("expected complete event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_results_unique_and_depths_consistent() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/a/">A again</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a><a href="/c">C</a>"#).await;
    mount_page(&mock_server, "/b", r#"<a href="/a">A</a><a href="/c">C</a>"#).await;
    mount_page(&mock_server, "/c", r#"<a href="/">Home</a>"#).await;

    let (outcome, _) =
        run_crawl(&CrawlRunConfig::new(mock_server.uri()), &create_test_config()).await;

    let found = locations(&outcome);
    let unique: HashSet<_> = found.iter().collect();
    assert_eq!(found.len(), unique.len());
    assert_eq!(found.len(), 4);

    for result in outcome.results() {
        let expected = match result.location.rsplit('/').next() {
            Some("") => 0,
            Some("a") | Some("b") => 1,
            Some("c") => 2,
            other => panic!("unexpected location {:?}", other),
        };
        assert_eq!(result.depth, expected, "depth of {}", result.location);
    }
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">Level 3</a>"#).await;

    // Linked from a depth-2 page, must never be fetched
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("<title>Too deep</title>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let run = CrawlRunConfig::new(mock_server.uri()).with_max_depth(Some(2));
    let (outcome, _) = run_crawl(&run, &create_test_config()).await;

    assert_eq!(outcome.state(), RunState::Completed);
    assert_eq!(outcome.results().len(), 3);
    assert!(outcome.results().iter().all(|r| r.depth <= 2));
}

#[tokio::test]
async fn test_max_pages_limit() {
    let mock_server = MockServer::start().await;

    let links: String = (1..10)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 1..10 {
        mount_page(&mock_server, &format!("/p{}", i), &links).await;
    }

    let run = CrawlRunConfig::new(mock_server.uri()).with_max_pages(Some(3));
    let (outcome, events) = run_crawl(&run, &create_test_config()).await;

    assert_eq!(outcome.results().len(), 3);

    match events.last() {
        Some(CrawlEvent::Complete(summary)) => {
            assert_eq!(summary.total_pages, 3);
            assert_eq!(summary.results.len(), 3);
        }
        other => panic!("expected complete event, got {:?}", other),
    }

    let url_events = events
        .iter()
        .filter(|e| matches!(e, CrawlEvent::Url(_)))
        .count();
    assert_eq!(url_events, 3);
}

#[tokio::test]
async fn test_binary_extension_not_fetched() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/report.pdf">PDF</a><a href="/report">Report</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(html_page("<title>Report</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (outcome, _) =
        run_crawl(&CrawlRunConfig::new(mock_server.uri()), &create_test_config()).await;

    assert_eq!(outcome.results().len(), 2);
}

#[tokio::test]
async fn test_fragment_and_trailing_slash_deduplicated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r##"<a href="/about#section">About</a><a href="/about/">About</a><a href="/about">About</a>"##,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(r##"<a href="/about#top">Top</a>"##))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (outcome, _) =
        run_crawl(&CrawlRunConfig::new(base_url.clone()), &create_test_config()).await;

    let about: Vec<_> = outcome
        .results()
        .iter()
        .filter(|r| r.location == format!("{}/about", base_url))
        .collect();
    assert_eq!(about.len(), 1);
    assert_eq!(about[0].depth, 1);
}

#[tokio::test]
async fn test_timeout_drops_page_without_retry() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#,
    )
    .await;
    mount_page(&mock_server, "/fast", r#"<a href="/slow">Slow again</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("late").set_delay(std::time::Duration::from_secs(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.fetch_timeout_ms = 300;

    let (outcome, _) = run_crawl(&CrawlRunConfig::new(mock_server.uri()), &config).await;

    assert_eq!(outcome.state(), RunState::Completed);
    assert!(outcome.results().iter().all(|r| !r.location.ends_with("/slow")));
    assert_eq!(outcome.results().len(), 2);
}

#[tokio::test]
async fn test_error_status_recorded_non_html_dropped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/data">Data</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw(
                r#"<title>Not Found</title><a href="/hidden">hidden</a>"#,
                "text/html",
            ),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"links": []}"#, "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The 404 body is never parsed, so its link is never followed
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html_page("hidden"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (outcome, _) =
        run_crawl(&CrawlRunConfig::new(mock_server.uri()), &create_test_config()).await;

    assert_eq!(outcome.results().len(), 2);

    let missing = outcome
        .results()
        .iter()
        .find(|r| r.location.ends_with("/missing"))
        .expect("404 page should be recorded");
    assert_eq!(missing.http_status, Some(404));
    assert_eq!(missing.title, None);
    assert!(!missing.is_success());

    assert!(outcome
        .results()
        .iter()
        .all(|r| !r.location.ends_with("/data")));
}

/// Cancels the run as soon as the first page is reported
struct CancelOnFirstUrl {
    token: CancellationToken,
    events: MemorySink,
}

impl EventSink for CancelOnFirstUrl {
    fn emit(&self, event: CrawlEvent) -> OutputResult<()> {
        if matches!(event, CrawlEvent::Url(_)) {
            self.token.cancel();
        }
        self.events.emit(event)
    }
}

#[tokio::test]
async fn test_cancellation_mid_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("next"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    let sink = CancelOnFirstUrl {
        token: token.clone(),
        events: MemorySink::new(),
    };

    let coordinator = Coordinator::new(&create_test_config()).unwrap();
    let outcome = coordinator
        .run(&CrawlRunConfig::new(mock_server.uri()), &sink, token)
        .await
        .unwrap();

    assert_eq!(outcome.state(), RunState::Cancelled);
    assert_eq!(outcome.results().len(), 1);

    let events = sink.events.events();
    let names: Vec<_> = events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["start", "url"]);
    assert!(!events.iter().any(|e| e.is_terminal()));
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_start() {
    let coordinator = Coordinator::new(&create_test_config()).unwrap();

    for seed in ["", "   ", "ftp://example.com/file", "https://"] {
        let sink = MemorySink::new();
        let result = coordinator
            .run(&CrawlRunConfig::new(seed), &sink, CancellationToken::new())
            .await;

        assert!(
            matches!(result, Err(SitemapError::InvalidSeed(_))),
            "seed {:?} gave {:?}",
            seed,
            result
        );
        assert!(sink.events().is_empty());
    }
}

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", "<title>A</title>").await;
    mount_page(&mock_server, "/b", "<title>B</title>").await;

    let coordinator = Coordinator::new(&create_test_config()).unwrap();
    let run = CrawlRunConfig::new(mock_server.uri());
    let (first_sink, second_sink) = (MemorySink::new(), MemorySink::new());

    let (first, second) = tokio::join!(
        coordinator.run(&run, &first_sink, CancellationToken::new()),
        coordinator.run(&run, &second_sink, CancellationToken::new()),
    );

    assert_eq!(first.unwrap().results().len(), 3);
    assert_eq!(second.unwrap().results().len(), 3);
}

#[tokio::test]
async fn test_crawl_convenience_function() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<title>Only page</title>").await;

    let config = create_test_config();
    let summary = crawl(&config, &config.run_config(mock_server.uri()))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.total_pages, 1);
    assert_eq!(summary.results[0].title.as_deref(), Some("Only page"));
    assert_eq!(summary.results[0].priority, 1.0);
}
