mod feed;
mod listing;
#[cfg(test)]
pub mod mock;

pub use feed::{FeedEntry, FeedSource};
pub use listing::ListingSource;
#[cfg(test)]
pub use mock::MockSource;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Maximum number of attempts for a failed HTTP request
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (100ms, 200ms, 400ms)
const BASE_DELAY_MS: u64 = 100;

/// A remote collection of release identifiers.
///
/// Sources only hand back raw strings; converting them into versions and
/// deciding what a conversion failure means is the caller's business.
#[async_trait]
pub trait Source: Send + Sync {
    /// Fetch every raw release identifier this source knows about.
    async fn fetch(&self) -> Result<Vec<String>>;

    /// Source name for display.
    fn name(&self) -> &'static str;
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .gzip(true)
        .user_agent(concat!("newest/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Execute an HTTP GET with retry and exponential backoff. Transient
/// failures (network errors, 5xx) are retried; 4xx responses are returned
/// as-is since they will not succeed on retry.
pub async fn get_with_retry(client: &Client, url: &str) -> Result<Response, reqwest::Error> {
    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        let backoff = Duration::from_millis(BASE_DELAY_MS * (1 << attempt));
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_server_error() && attempt < MAX_RETRIES - 1 {
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                return Ok(response);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < MAX_RETRIES - 1 {
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    Err(last_error.unwrap())
}

/// Human-readable failure line for a non-success status from a source.
pub fn http_error_message(status: reqwest::StatusCode, what: &str, url: &str) -> String {
    let code = status.as_u16();
    match code {
        401 | 403 => format!(
            "Access to the {} at {} was denied (HTTP {}). It may be private or need credentials.",
            what, url, code
        ),
        404 => format!(
            "No {} found at {} (HTTP 404). Check the URL for typos.",
            what, url
        ),
        408 | 504 => format!(
            "Request for the {} at {} timed out (HTTP {}). The server may be slow or unreachable.",
            what, url, code
        ),
        429 => format!(
            "Rate limited while fetching the {} at {} (HTTP 429). Wait a moment and try again.",
            what, url
        ),
        500..=599 => format!(
            "Server error while fetching the {} at {} (HTTP {}).",
            what, url, code
        ),
        _ => format!(
            "Failed to fetch the {} at {}: HTTP {} {}",
            what,
            url,
            code,
            status.canonical_reason().unwrap_or("Unknown error")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_with_retry_success_first_try() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/releases", mock_server.uri());

        let response = get_with_retry(&client, &url).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_get_with_retry_client_error_no_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/missing", mock_server.uri());

        let response = get_with_retry(&client, &url).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_get_with_retry_server_error_retries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/flaky", mock_server.uri());

        // After the retries run out the last 500 comes back.
        let response = get_with_retry(&client, &url).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn test_get_with_retry_recovers_after_server_error() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mock_server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        Mock::given(method("GET"))
            .and(path("/recover"))
            .respond_with(move |_: &wiremock::Request| {
                if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(500)
                } else {
                    ResponseTemplate::new(200).set_body_string("recovered")
                }
            })
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/recover", mock_server.uri());

        let response = get_with_retry(&client, &url).await.unwrap();
        assert!(response.status().is_success());
    }

    #[test]
    fn test_http_error_messages() {
        use reqwest::StatusCode;

        let msg = http_error_message(StatusCode::NOT_FOUND, "version feed", "http://x/feed");
        assert!(msg.contains("HTTP 404"));
        assert!(msg.contains("http://x/feed"));

        let msg = http_error_message(StatusCode::FORBIDDEN, "object listing", "http://x/o");
        assert!(msg.contains("denied"));

        let msg = http_error_message(StatusCode::BAD_GATEWAY, "version feed", "http://x/feed");
        assert!(msg.contains("Server error"));
    }
}
