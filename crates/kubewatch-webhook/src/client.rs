//! HTTP client for posting webhook notifications.
//!
//! Sends exactly one request per call. The response status is recorded and
//! logged but never turned into an error: any response at all counts as a
//! completed delivery.

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Result, WebhookError};

/// Configuration for the webhook HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Overall request timeout. `None` waits as long as the endpoint takes.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout: None, user_agent: concat!("kubewatch/", env!("CARGO_PKG_VERSION")).to_string() }
    }
}

/// Outcome of a request that reached the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostResponse {
    /// HTTP status code returned by the endpoint.
    pub status_code: u16,
    /// Total duration of the request.
    pub duration: Duration,
}

impl PostResponse {
    /// Whether the endpoint answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP client shared by every dispatch of one sink.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| WebhookError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Creates a client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ClientConfig::default())
    }

    /// Posts `body` as JSON to `url`.
    ///
    /// When `signature` is given as `(header name, value)` it is attached
    /// verbatim. `body` is sent as-is, so a signature computed over it
    /// matches what the endpoint receives.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Transport` if the request cannot be built
    /// (malformed URL, invalid header) or the connection fails.
    pub async fn post(
        &self,
        url: &str,
        body: Bytes,
        signature: Option<(&str, &str)>,
    ) -> Result<PostResponse> {
        let mut request = self.client.post(url).header(CONTENT_TYPE, "application/json").body(body);
        if let Some((header, value)) = signature {
            request = request.header(header, value);
        }

        let request = request.build().map_err(|e| WebhookError::transport(e.to_string()))?;

        let start_time = Instant::now();
        let response = self.client.execute(request).await.map_err(|e| {
            tracing::debug!(duration_ms = start_time.elapsed().as_millis(), "Request failed: {}", e);
            WebhookError::transport(e.to_string())
        })?;

        let response =
            PostResponse { status_code: response.status().as_u16(), duration: start_time.elapsed() };

        if response.is_success() {
            tracing::debug!(
                status = response.status_code,
                duration_ms = response.duration.as_millis(),
                "Received response"
            );
        } else {
            tracing::warn!(
                status = response.status_code,
                duration_ms = response.duration.as_millis(),
                "Endpoint answered with a non-success status"
            );
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;

    const BODY: &[u8] = br#"{"text":"hello"}"#;

    #[tokio::test]
    async fn posts_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/hook"))
            .and(matchers::header("content-type", "application/json"))
            .and(matchers::body_bytes(BODY))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WebhookClient::with_defaults().unwrap();
        let response = client
            .post(&format!("{}/hook", mock_server.uri()), Bytes::from_static(BODY), None)
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn attaches_signature_header() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::header("X-KubeWatch-Signature", "abc123"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WebhookClient::with_defaults().unwrap();
        let response = client
            .post(
                &mock_server.uri(),
                Bytes::from_static(BODY),
                Some(("X-KubeWatch-Signature", "abc123")),
            )
            .await
            .unwrap();

        assert_eq!(response.status_code, 204);
    }

    #[tokio::test]
    async fn non_success_status_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WebhookClient::with_defaults().unwrap();
        let response =
            client.post(&mock_server.uri(), Bytes::from_static(BODY), None).await.unwrap();

        assert_eq!(response.status_code, 500);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let client = WebhookClient::with_defaults().unwrap();

        let result = client.post("not a url", Bytes::from_static(BODY), None).await;

        assert!(matches!(result, Err(WebhookError::Transport { .. })));
    }

    #[tokio::test]
    async fn invalid_header_name_is_a_transport_error() {
        let mock_server = MockServer::start().await;
        let client = WebhookClient::with_defaults().unwrap();

        let result = client
            .post(&mock_server.uri(), Bytes::from_static(BODY), Some(("Bad Header", "x")))
            .await;

        assert!(matches!(result, Err(WebhookError::Transport { .. })));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn configured_timeout_is_applied() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let config = ClientConfig { timeout: Some(Duration::from_millis(100)), ..Default::default() };
        let client = WebhookClient::new(&config).unwrap();

        let result = client.post(&mock_server.uri(), Bytes::from_static(BODY), None).await;

        assert!(matches!(result, Err(WebhookError::Transport { .. })));
    }

    #[test]
    fn default_config_has_no_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, None);
        assert!(config.user_agent.starts_with("kubewatch/"));
    }
}
