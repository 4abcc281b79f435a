/*!
 * HTTP fetcher tests against a local mock server
 */

use anyhow::Result;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use az305_sync::app_config::HttpConfig;
use az305_sync::errors::FetchError;
use az305_sync::fetcher::{HttpFetcher, PageSource};

fn fetcher() -> HttpFetcher {
    let config = HttpConfig {
        timeout_secs: 5,
        user_agent: "az305-sync-tests".to_string(),
    };
    HttpFetcher::new(&config).expect("client should build")
}

/// Test that a page body comes back verbatim and the user agent is sent
#[tokio::test]
async fn test_fetch_page_withSuccess_shouldReturnBody() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "az305-sync-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h2>Skills measured</h2>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher().fetch_page(&format!("{}/page", server.uri())).await?;
    assert_eq!(body, "<h2>Skills measured</h2>");
    Ok(())
}

/// Test that server errors map to a status error without retrying
#[tokio::test]
async fn test_fetch_page_withServerError_shouldReturnStatusOnce() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher().fetch_page(&format!("{}/page", server.uri())).await;
    assert!(matches!(result, Err(FetchError::Status { status_code: 503, .. })));
    Ok(())
}

/// Test that binary downloads carry the content type
#[tokio::test]
async fn test_fetch_bytes_withImage_shouldReturnBodyAndContentType() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diagram.svg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/svg+xml")
                .set_body_bytes(b"<svg/>".to_vec()),
        )
        .mount(&server)
        .await;

    let download = fetcher().fetch_bytes(&format!("{}/diagram.svg", server.uri())).await?;
    assert_eq!(download.body.as_ref(), b"<svg/>");
    assert_eq!(download.content_type.as_deref(), Some("image/svg+xml"));
    Ok(())
}

/// Test that an invalid URL is rejected before any request
#[tokio::test]
async fn test_fetch_page_withInvalidUrl_shouldReturnInvalidUrl() {
    let result = fetcher().fetch_page("not a url").await;
    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}

/// Test that an unreachable host is a request error
#[tokio::test]
async fn test_fetch_page_withClosedPort_shouldReturnRequestError() {
    let result = fetcher().fetch_page("http://127.0.0.1:9/unreachable").await;
    assert!(matches!(result, Err(FetchError::Request { .. })));
}
