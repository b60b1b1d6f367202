//! Mock webhook endpoint for delivery tests.

use http::HeaderMap;
use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path the mock endpoint listens on.
pub const HOOK_PATH: &str = "/hook";

/// Webhook receiver backed by a local mock server.
pub struct MockEndpoint {
    server: MockServer,
}

impl MockEndpoint {
    /// Starts an endpoint that answers every POST with `200 OK`.
    pub async fn start() -> Self {
        Self::start_with_status(200).await
    }

    /// Starts an endpoint that answers every POST with `status`.
    pub async fn start_with_status(status: u16) -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(HOOK_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Full URL to configure as the webhook destination.
    pub fn url(&self) -> String {
        format!("{}{HOOK_PATH}", self.server.uri())
    }

    /// Returns every request received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if request recording was disabled on the server.
    pub async fn received(&self) -> Vec<ReceivedWebhook> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled")
            .into_iter()
            .map(|request| ReceivedWebhook {
                method: request.method.to_string(),
                headers: request.headers,
                body: request.body,
            })
            .collect()
    }

    /// Asserts that exactly `expected` requests were received.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.received().await.len();
        assert_eq!(received, expected, "expected {expected} requests, received {received}");
    }
}

/// A request captured by [`MockEndpoint`].
#[derive(Debug, Clone)]
pub struct ReceivedWebhook {
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Raw body bytes, exactly as received.
    pub body: Vec<u8>,
}

impl ReceivedWebhook {
    /// Returns a header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Parses the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("webhook body should be JSON")
    }
}
