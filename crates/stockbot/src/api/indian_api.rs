//! IndianAPI stock data client

use super::{Endpoint, StockApi};
use crate::config::{BotConfig, DEFAULT_API_BASE_URL};
use crate::error::{Result, StockError, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "x-api-key";

/// IndianAPI stock data client
#[derive(Debug, Clone)]
pub struct IndianApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl IndianApiClient {
    /// Create a client against the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| StockError::ConfigError(format!("invalid API base URL {base_url}: {e}")))?;

        // Url::join replaces the last segment unless the path ends with '/'
        let path = format!("{}/", base_url.path().trim_end_matches('/'));
        base_url.set_path(&path);

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Create a client from the bot configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::with_base_url(config.api_key.clone(), &config.api_base_url)
    }

    /// Full request URL for an endpoint, query string included
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&endpoint.path())
            .map_err(|e| StockError::ConfigError(format!("invalid endpoint path: {e}")))?;

        if let Some((key, value)) = endpoint.query() {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url)
    }
}

#[async_trait]
impl StockApi for IndianApiClient {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.url(&endpoint)?;
        debug!(path = %url.path(), "fetching upstream");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(UpstreamError::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(UpstreamError::from)?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            }
            .into());
        }

        let value = serde_json::from_slice(&body).map_err(UpstreamError::from)?;
        Ok(value)
    }
}

/// Pull a human-readable message out of an error body
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Exchange;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_client_creation() {
        let client = IndianApiClient::new("test_key").unwrap();
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url.as_str(), "https://stock.indianapi.in/");
    }

    #[test]
    fn test_urls() {
        let client = IndianApiClient::new("k").unwrap();
        let url = client.url(&Endpoint::MostActive(Exchange::Nse)).unwrap();
        assert_eq!(url.as_str(), "https://stock.indianapi.in/NSE_most_active");

        let url = client
            .url(&Endpoint::Stock {
                name: "Tata Motors & Co".to_string(),
            })
            .unwrap();
        assert_eq!(url.path(), "/stock");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("name".to_string(), "Tata Motors & Co".to_string())]);
        assert_eq!(url.query(), Some("name=Tata+Motors+%26+Co"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let client = IndianApiClient::with_base_url("k", "http://localhost:8080/v1").unwrap();
        let url = client.url(&Endpoint::Trending).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/trending");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = IndianApiClient::with_base_url("k", "::nope::");
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"message": "Invalid API key"}"#),
            Some("Invalid API key".to_string())
        );
        assert_eq!(
            error_message(br#"{"error": "quota exhausted"}"#),
            Some("quota exhausted".to_string())
        );
        assert_eq!(error_message(br#"{"message": "  "}"#), None);
        assert_eq!(error_message(br#"{"detail": "Not Found"}"#), None);
        assert_eq!(error_message(b"<html>Bad Gateway</html>"), None);
    }

    #[tokio::test]
    async fn test_fetch_sends_api_key_and_decodes_json() {
        let (base, server) = serve_once("200 OK", r#"[{"company": "ACME"}]"#).await;
        let client = IndianApiClient::with_base_url("secret-key", &base).unwrap();

        let value = client
            .fetch(Endpoint::MostActive(Exchange::Bse))
            .await
            .unwrap();
        assert_eq!(value[0]["company"], "ACME");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /bse_most_active http/1.1"));
        assert!(request.contains("x-api-key: secret-key"));
    }

    #[tokio::test]
    async fn test_fetch_stock_encodes_query() {
        let (base, server) = serve_once("200 OK", r#"{"companyName": "Tata Motors"}"#).await;
        let client = IndianApiClient::with_base_url("k", &base).unwrap();

        let value = client
            .fetch(Endpoint::Stock {
                name: "Tata Motors".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(value["companyName"], "Tata Motors");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /stock?name=Tata+Motors HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_carries_upstream_message() {
        let (base, _server) = serve_once("403 Forbidden", r#"{"message": "Invalid API key"}"#).await;
        let client = IndianApiClient::with_base_url("bad", &base).unwrap();

        let err = client.fetch(Endpoint::Ipo).await.unwrap_err();
        match err {
            StockError::Upstream(UpstreamError::Status { status, ref message }) => {
                assert_eq!(status, 403);
                assert_eq!(message.as_deref(), Some("Invalid API key"));
            }
            other => panic!("Expected status error, got {other:?}"),
        }
        assert_eq!(err.upstream_message(), Some("Invalid API key"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_json() {
        let (base, _server) = serve_once("200 OK", "not json").await;
        let client = IndianApiClient::with_base_url("k", &base).unwrap();

        let err = client.fetch(Endpoint::Trending).await.unwrap_err();
        assert!(matches!(err, StockError::Upstream(UpstreamError::Malformed(_))));
        assert_eq!(err.upstream_message(), None);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = IndianApiClient::with_base_url("k", &format!("http://{addr}")).unwrap();
        let err = client.fetch(Endpoint::Trending).await.unwrap_err();
        assert!(matches!(err, StockError::Upstream(UpstreamError::Network(_))));
    }

    #[tokio::test]
    #[ignore] // Requires INDIAN_API_KEY and network access
    async fn test_live_trending() {
        let key = std::env::var("INDIAN_API_KEY").unwrap();
        let client = IndianApiClient::new(key).unwrap();
        let value = client.fetch(Endpoint::Trending).await.unwrap();
        assert!(value.get("trending_stocks").is_some());
    }
}
