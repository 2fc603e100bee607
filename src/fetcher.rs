use crate::errors::{AppError, AppResult};
use reqwest::StatusCode;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

/// Outcome of requesting the countries page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    /// The server answered `200 OK` with this body.
    Page(String),
    /// The server answered with any other status; the run stops here.
    Unavailable(StatusCode),
}

/// Builds the HTTP client used for the single page request.
pub fn build_client(user_agent: &str) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))
}

/// Fetches the HTML of the countries page.
///
/// Only `200 OK` counts as success. Other statuses are reported as
/// [`PageFetch::Unavailable`] instead of an error so the caller can end the
/// run without writing anything.
///
/// # Errors
///
/// Returns `NetworkError` if the request cannot be sent or the body cannot be read.
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> AppResult<PageFetch> {
    info!(url = %url, "Fetching countries page");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to fetch {url}: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!(url = %url, status = status.as_u16(), "Page not available");
        return Ok(PageFetch::Unavailable(status));
    }

    let body = response.text().await?;
    info!(bytes = body.len(), "Countries page fetched");
    Ok(PageFetch::Page(body))
}

/// Reads a previously saved copy of the countries page from disk.
pub async fn load_page(path: &Path) -> AppResult<String> {
    info!(path = %path.display(), "Reading countries page from file");
    tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::IoError(format!("Failed to read HTML file {}: {e}", path.display()))
    })
}
