//! Integration tests for fetcher module, against a local HTTP server

#[path = "common/mod.rs"]
mod common;

use common::*;
use countries_scraper::errors::AppError;
use countries_scraper::fetcher::{build_client, fetch_page, PageFetch};
use reqwest::StatusCode;
use url::Url;

#[tokio::test]
async fn test_fetch_page_ok_returns_body() {
    let (url, server) = serve_once(ok_response(SAMPLE_COUNTRIES_PAGE)).await;
    let client = build_client("Mozilla/5.0").unwrap();

    let fetch = fetch_page(&client, &url).await.unwrap();

    assert_eq!(fetch, PageFetch::Page(SAMPLE_COUNTRIES_PAGE.to_string()));
    let request = server.await.unwrap();
    assert!(request.starts_with("GET /pages/simple/ HTTP/1.1"));
    assert!(request.to_lowercase().contains("user-agent: mozilla/5.0"));
}

#[tokio::test]
async fn test_fetch_page_not_found_is_unavailable() {
    let (url, server) = serve_once(NOT_FOUND_RESPONSE.to_string()).await;
    let client = build_client("Mozilla/5.0").unwrap();

    let fetch = fetch_page(&client, &url).await.unwrap();

    assert_eq!(fetch, PageFetch::Unavailable(StatusCode::NOT_FOUND));
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_page_connection_refused_is_network_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    let client = build_client("Mozilla/5.0").unwrap();

    let err = fetch_page(&client, &url).await.unwrap_err();

    assert!(matches!(err, AppError::NetworkError(_)));
}
