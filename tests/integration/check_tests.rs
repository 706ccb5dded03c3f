//! Integration tests for single-mode link checking
//!
//! These tests use wiremock to stand up HTTP servers and run the checker
//! end-to-end against them.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use unlinked::{
    CancellationToken, CheckMode, CheckResult, Checker, Config, ConfigError, LinkResult,
    LinkStatus, UnlinkedError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a single-mode configuration suitable for tests
fn create_test_config() -> Config {
    Config {
        mode: CheckMode::Single,
        concurrency: 8,
        timeout: 5,
        user_agent: "UnlinkedTest/1.0".to_string(),
        ..Config::default()
    }
}

/// Finds the result whose URL ends with `suffix`
fn find_link<'a>(result: &'a CheckResult, suffix: &str) -> &'a LinkResult {
    result
        .links
        .iter()
        .find(|l| l.url.ends_with(suffix))
        .unwrap_or_else(|| panic!("no result for {}", suffix))
}

#[tokio::test]
async fn test_classifies_responses() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/x"))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let config = Config {
        timeout: 1,
        follow_redirects: false,
        ..create_test_config()
    };
    let checker = Checker::new(config).expect("Failed to build checker");

    let urls: Vec<String> = ["/ok", "/moved", "/missing", "/slow"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .chain(std::iter::once("http://127.0.0.1:1/refused".to_string()))
        .collect();

    let result = checker
        .check_urls(&urls, &CancellationToken::new())
        .await
        .expect("Check failed");

    assert_eq!(result.total_checked, 5);
    assert_eq!(result.links.len(), 5);

    let ok = find_link(&result, "/ok");
    assert_eq!(ok.status, LinkStatus::Ok);
    assert_eq!(ok.status_code, 200);
    assert!(ok.found_on.is_none());

    let moved = find_link(&result, "/moved");
    assert_eq!(moved.status, LinkStatus::Redirect);
    assert_eq!(moved.status_code, 301);
    assert_eq!(moved.redirect_url.as_deref(), Some("/x"));

    let missing = find_link(&result, "/missing");
    assert_eq!(missing.status, LinkStatus::Dead);
    assert_eq!(missing.status_code, 404);

    let slow = find_link(&result, "/slow");
    assert_eq!(slow.status, LinkStatus::Timeout);

    let refused = find_link(&result, "/refused");
    assert_eq!(refused.status, LinkStatus::Error);
    assert!(refused.error.as_deref().is_some_and(|e| !e.is_empty()));

    assert_eq!(result.total_ok, 1);
    assert_eq!(result.total_redirect, 1);
    assert_eq!(result.total_dead, 1);
    assert_eq!(result.total_errors, 2);
    assert!(result.has_broken());
}

#[tokio::test]
async fn test_identical_seeds_probed_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/same"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        concurrency: 64,
        ..create_test_config()
    };
    let checker = Checker::new(config).expect("Failed to build checker");

    let url = format!("{}/same", mock_server.uri());
    let urls = vec![url; 50];

    let result = checker
        .check_urls(&urls, &CancellationToken::new())
        .await
        .expect("Check failed");

    assert_eq!(result.total_checked, 50);
    assert_eq!(result.total_ok, 1);
    assert_eq!(result.total_skipped(), 49);

    for skipped in result
        .links
        .iter()
        .filter(|l| l.status == LinkStatus::Skipped)
    {
        assert_eq!(skipped.status_code, 0);
        assert!(skipped.error.is_none());
        assert!(skipped.redirect_url.is_none());
    }
}

#[tokio::test]
async fn test_counts_match_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = Config {
        concurrency: 3,
        ignore_patterns: vec!["/private/".to_string()],
        ..create_test_config()
    };
    let checker = Checker::new(config).expect("Failed to build checker");

    let mut urls: Vec<String> = (0..20).map(|i| format!("{}/page{}", base_url, i)).collect();
    urls.push(format!("{}/private/a", base_url));
    urls.push(format!("{}/page3", base_url));

    let result = checker
        .check_urls(&urls, &CancellationToken::new())
        .await
        .expect("Check failed");

    assert_eq!(result.total_checked, result.links.len());
    assert_eq!(result.total_checked, 22);
    assert_eq!(result.total_ok, 20);
    assert_eq!(result.total_skipped(), 2);
    assert!(
        result.total_ok + result.total_dead + result.total_redirect + result.total_errors
            <= result.total_checked
    );
    assert!(result.end_time >= result.start_time);

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests.len(), 20);
    assert!(requests.iter().all(|r| r.url.path() != "/private/a"));
}

#[tokio::test]
async fn test_progress_skips_unprobed_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = Config {
        ignore_patterns: vec!["ignored".to_string()],
        ..create_test_config()
    };
    let mut checker = Checker::new(config).expect("Failed to build checker");

    let events: Arc<Mutex<Vec<(String, LinkStatus)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    checker.set_progress_callback(move |url, status| {
        sink.lock().unwrap().push((url.to_string(), status));
    });

    let a = format!("{}/a", base_url);
    let b = format!("{}/b", base_url);
    let urls = vec![
        a.clone(),
        a.clone(),
        b.clone(),
        format!("{}/ignored", base_url),
    ];

    let result = checker
        .check_urls(&urls, &CancellationToken::new())
        .await
        .expect("Check failed");
    assert_eq!(result.total_checked, 4);

    let mut seen = events.lock().unwrap().clone();
    seen.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(seen, vec![(a, LinkStatus::Ok), (b, LinkStatus::Ok)]);
}

#[tokio::test]
async fn test_second_run_skips_checked_urls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/once"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let checker = Checker::new(create_test_config()).expect("Failed to build checker");
    let urls = vec![format!("{}/once", mock_server.uri())];
    let cancel = CancellationToken::new();

    let first = checker.check_urls(&urls, &cancel).await.expect("Check failed");
    assert_eq!(first.total_ok, 1);

    let second = checker.check_urls(&urls, &cancel).await.expect("Check failed");
    assert_eq!(second.total_checked, 2);
    assert_eq!(second.total_skipped(), 1);
    assert_eq!(checker.summary().total_checked, 2);
}

#[tokio::test]
async fn test_immediate_cancellation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let checker = Checker::new(create_test_config()).expect("Failed to build checker");
    let urls = vec![
        format!("{}/a", mock_server.uri()),
        format!("{}/b", mock_server.uri()),
    ];

    let cancel = CancellationToken::new();
    cancel.cancel();

    let first = checker.check_urls(&urls, &cancel).await;
    let second = checker.check_urls(&urls, &cancel).await;

    assert!(matches!(first, Err(UnlinkedError::Cancelled)));
    assert!(matches!(second, Err(UnlinkedError::Cancelled)));
}

#[tokio::test]
async fn test_cancellation_mid_run_returns_promptly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let config = Config {
        timeout: 60,
        concurrency: 2,
        ..create_test_config()
    };
    let checker = Checker::new(config).expect("Failed to build checker");
    let urls: Vec<String> = (0..6)
        .map(|i| format!("{}/slow{}", mock_server.uri(), i))
        .collect();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        checker.check_urls(&urls, &cancel),
    )
    .await
    .expect("Cancellation did not stop the run");

    assert!(matches!(outcome, Err(UnlinkedError::Cancelled)));
}

#[test]
fn test_invalid_ignore_pattern() {
    let config = Config {
        ignore_patterns: vec!["(unclosed".to_string()],
        ..create_test_config()
    };

    match Checker::new(config) {
        Err(UnlinkedError::Config(ConfigError::InvalidPattern { pattern, .. })) => {
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("expected InvalidPattern, got {:?}", other),
    }
}

#[tokio::test]
async fn test_seed_spellings_dedup_as_one_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let checker = Checker::new(create_test_config()).expect("Failed to build checker");
    let bare = mock_server.uri();
    let urls = vec![bare.clone(), format!("{}/", bare)];

    let result = checker
        .check_urls(&urls, &CancellationToken::new())
        .await
        .expect("Check failed");

    assert_eq!(result.total_checked, 2);
    assert_eq!(result.total_ok, 1);
    assert_eq!(result.total_skipped(), 1);
    assert!(result.links.iter().all(|l| l.url == format!("{}/", bare)));
}
