//! Integration tests for `PageClient::fetch_page`.
//!
//! Each test stands up a local `wiremock` server; no real network traffic
//! is made.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use darazscout_scraper::{PageClient, ScraperError};

/// Direct fetches, no retries.
fn test_client() -> PageClient {
    PageClient::new(5, "darazscout-test/0.1", "", 0, 0).expect("failed to build test PageClient")
}

fn test_client_with_retries(max_retries: u32) -> PageClient {
    PageClient::new(5, "darazscout-test/0.1", "", max_retries, 0)
        .expect("failed to build test PageClient")
}

// ---------------------------------------------------------------------------
// happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartphones/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>phones</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page(&format!("{}/smartphones/", server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<html>phones</html>");
}

#[tokio::test]
async fn fetch_page_goes_through_relay_with_encoded_target() {
    let server = MockServer::start().await;
    let target = "https://www.daraz.lk/catalog/?page=2&q=racks";

    // The relay sees the whole target as its query string.
    Mock::given(method("GET"))
        .and(path("/relay"))
        .and(query_param(target, ""))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>racks</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PageClient::new(5, "darazscout-test/0.1", &format!("{}/relay?", server.uri()), 0, 0)
        .expect("failed to build relay PageClient");
    let body = client.fetch_page(target).await.expect("fetch should succeed");
    assert_eq!(body, "<html>racks</html>");
}

#[tokio::test]
async fn fetch_page_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/laptops/"))
        .and(wiremock::matchers::header("user-agent", "darazscout-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_page(&format!("{}/laptops/", server.uri()))
        .await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

// ---------------------------------------------------------------------------
// error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/gone/", server.uri());
    let err = test_client().fetch_page(&url).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::NotFound { url: ref u } if *u == url),
        "expected NotFound, got: {err:?}"
    );
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn fetch_page_maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_page(&format!("{}/mens-watches/", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            ScraperError::RateLimited {
                retry_after_secs: 17,
                ..
            }
        ),
        "expected RateLimited, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_page_maps_other_status_to_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_page(&format!("{}/blocked/", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_page_rejects_invalid_url_without_request() {
    let err = test_client().fetch_page("not a url").await.unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_retries_server_error_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client_with_retries(2)
        .fetch_page(&format!("{}/smartphones/", server.uri()))
        .await
        .expect("fetch should succeed after one retry");
    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn fetch_page_waits_for_retry_after_before_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("after wait"))
        .expect(1)
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let body = test_client_with_retries(1)
        .fetch_page(&format!("{}/smartphones/", server.uri()))
        .await
        .expect("fetch should succeed after the rate limit clears");
    assert_eq!(body, "after wait");
    assert!(
        started.elapsed() >= std::time::Duration::from_secs(1),
        "retried after {:?}, before Retry-After elapsed",
        started.elapsed()
    );
}

#[tokio::test]
async fn fetch_page_429_without_retry_after_reports_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_page(&format!("{}/smartphones/", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScraperError::RateLimited {
            retry_after_secs: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn fetch_page_does_not_retry_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(3)
        .fetch_page(&format!("{}/gone/", server.uri()))
        .await;
    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
}

#[tokio::test]
async fn fetch_page_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = test_client_with_retries(2)
        .fetch_page(&format!("{}/flaky/", server.uri()))
        .await;
    assert!(matches!(
        result,
        Err(ScraperError::UnexpectedStatus { status: 500, .. })
    ));
}
