//! Webhook notification sink.
//!
//! One dispatch runs start to finish inside the caller's `handle` call:
//!
//! 1. **Envelope** - build a [`WebhookMessage`] stamped with the current time
//! 2. **Serialize** - encode it to JSON once
//! 3. **Sign** - HMAC the encoded bytes when a key is configured
//! 4. **Post** - send those same bytes in a single request
//! 5. **Report** - hand the outcome to the [`DeliveryReporter`]
//!
//! Failures end the dispatch for that event only. Nothing is retried.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use kubewatch_core::{Clock, Event, Handler, SystemClock};
use tracing::{info_span, Instrument};

use crate::{
    client::{ClientConfig, WebhookClient},
    config::{Config, WebhookSink},
    env::EnvSource,
    error::Result,
    message::WebhookMessage,
    reporter::{DeliveryReport, DeliveryReporter, TracingReporter},
};

/// Details of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// HTTP status the endpoint answered with.
    pub status_code: u16,
    /// When the request completed.
    pub sent_at: DateTime<Utc>,
    /// Signature header value, if the payload was signed.
    pub signature: Option<String>,
}

/// Sink that posts each event as JSON to a webhook endpoint.
#[derive(Debug, Clone)]
pub struct Webhook {
    sink: WebhookSink,
    client: WebhookClient,
    reporter: Arc<dyn DeliveryReporter>,
    clock: Arc<dyn Clock>,
}

impl Webhook {
    /// Creates a webhook sink that logs outcomes through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Transport` if the HTTP client cannot be built.
    pub fn new(sink: WebhookSink, client_config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            sink,
            client: WebhookClient::new(client_config)?,
            reporter: Arc::new(TracingReporter),
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Resolves the sink from configuration and environment and creates the
    /// handler.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Config` if the configuration is invalid.
    pub fn from_config(config: &Config, env: &impl EnvSource) -> Result<Self> {
        let sink = WebhookSink::resolve(&config.handler.webhook, env)?;
        Self::new(sink, &config.to_client_config())
    }

    /// Replaces the outcome reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn DeliveryReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the clock used for envelope and report timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Destination this handler posts to.
    pub fn sink(&self) -> &WebhookSink {
        &self.sink
    }

    /// Sends `event` and returns the outcome without reporting it.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Serialization` if the envelope cannot be
    /// encoded and `WebhookError::Transport` if the request fails.
    pub async fn send(&self, event: &Event) -> Result<Delivery> {
        let message = WebhookMessage::from_event(event, self.clock.as_ref());
        let body = Bytes::from(message.to_bytes()?);

        let signature = self.sink.signing_key().map(|key| key.sign(&body));
        let signature_header =
            signature.as_deref().map(|value| (self.sink.signature_header(), value));

        let response = self.client.post(self.sink.url(), body, signature_header).await?;

        Ok(Delivery { status_code: response.status_code, sent_at: self.clock.now(), signature })
    }
}

#[async_trait::async_trait]
impl Handler for Webhook {
    async fn handle(&self, event: &Event) {
        let span = info_span!(
            "webhook_delivery",
            url = %self.sink.url(),
            kind = %event.kind,
            name = %event.name,
            namespace = %event.namespace,
        );

        let report = match self.send(event).instrument(span.clone()).await {
            Ok(delivery) => DeliveryReport::Sent {
                url: self.sink.url().to_string(),
                status_code: delivery.status_code,
                sent_at: delivery.sent_at,
            },
            Err(error) => DeliveryReport::Failed {
                url: self.sink.url().to_string(),
                category: error.category(),
                error: error.to_string(),
            },
        };

        span.in_scope(|| self.reporter.report(&report));
    }
}
