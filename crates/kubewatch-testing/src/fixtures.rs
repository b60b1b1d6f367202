//! Builders and helpers for test data.

use std::net::TcpListener;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kubewatch_core::Event;

/// Builder for watch events.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    /// Starts from an event with every field empty.
    pub fn new() -> Self {
        Self { event: Event::default() }
    }

    /// Starts from a freshly created `nginx-1` pod in `default`.
    pub fn with_defaults() -> Self {
        Self { event: Event::new("Pod", "nginx-1", "default", "Created") }
    }

    /// Sets the resource kind.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.event.kind = kind.into();
        self
    }

    /// Sets the object name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.event.name = name.into();
        self
    }

    /// Sets the object namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.event.namespace = namespace.into();
        self
    }

    /// Sets the reason.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.event.reason = reason.into();
        self
    }

    /// Returns the built event.
    pub fn build(self) -> Event {
        self.event
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Standard base64 encoding of `raw`, as expected in `hmacKey`.
pub fn base64_key(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// Returns a URL on localhost where nothing is listening.
///
/// # Panics
///
/// Panics if no local port can be reserved.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to reserve a local port");
    let port = listener.local_addr().expect("listener has no local address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/hook")
}
