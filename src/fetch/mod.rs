//! Page retrieval
//!
//! The monitored page is fetched with a plain GET; no custom headers beyond
//! the client's user agent and no retries.

use crate::error::FetchError;

/// Source of raw page markup
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the response body for `uri` as text
    async fn fetch(&self, uri: &str) -> Result<String, FetchError>;
}

/// HTTP page source backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default client
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", uri);

        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                uri: uri.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            uri: uri.to_string(),
            source,
        })?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), uri);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_uri_is_request_error() {
        let fetcher = HttpFetcher::new();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let fetcher = HttpFetcher::new();
        // Port 9 on loopback (discard) is closed on any normal test host
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tour")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let uri = format!("{}/tour", server.url());
        let err = HttpFetcher::new().fetch(&uri).await.unwrap_err();

        mock.assert_async().await;
        match err {
            FetchError::Status { uri: failed, status } => {
                assert_eq!(status, 503);
                assert_eq!(failed, uri);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tour")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<div class="thb-text">Dates</div>"#)
            .create_async()
            .await;

        let body = HttpFetcher::new()
            .fetch(&format!("{}/tour", server.url()))
            .await
            .unwrap();
        assert_eq!(body, r#"<div class="thb-text">Dates</div>"#);
    }
}
