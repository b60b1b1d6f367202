//! JSON envelope posted to the webhook endpoint.

use chrono::{DateTime, Utc};
use kubewatch_core::{Clock, Event};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of a webhook notification.
///
/// ```json
/// {
///   "eventmeta": {"kind": "Pod", "name": "nginx-1", "namespace": "default", "reason": "Created"},
///   "text": "A `Pod` in namespace `default` has been `Created`:\n`nginx-1`",
///   "time": "2024-03-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    /// Identifying fields of the event.
    #[serde(rename = "eventmeta")]
    pub event_meta: EventMeta,
    /// Human-readable description of the event.
    pub text: String,
    /// When the message was built.
    pub time: DateTime<Utc>,
}

/// Metadata about the event that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Resource kind.
    pub kind: String,
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// What happened to the object.
    pub reason: String,
}

impl WebhookMessage {
    /// Builds a message for `event`, stamped with the clock's current time.
    pub fn from_event(event: &Event, clock: &dyn Clock) -> Self {
        Self {
            event_meta: EventMeta {
                kind: event.kind.clone(),
                name: event.name.clone(),
                namespace: event.namespace.clone(),
                reason: event.reason.clone(),
            },
            text: event.message(),
            time: clock.now(),
        }
    }

    /// Serializes the message to the exact bytes that get signed and sent.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Serialization` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
