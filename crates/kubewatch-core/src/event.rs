//! Kubernetes watch events as seen by notification sinks.

use serde::{Deserialize, Serialize};

/// Kinds whose objects are cluster scoped and therefore have no namespace
/// worth mentioning in a message.
const CLUSTER_SCOPED_KINDS: &[&str] = &["namespace", "node", "cluster role", "persistent volume"];

/// A single change observed by the watch pipeline.
///
/// Sinks treat events as read-only input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Resource kind, e.g. `Pod` or `namespace`.
    pub kind: String,
    /// Name of the affected object.
    pub name: String,
    /// Namespace of the affected object, empty for cluster scoped kinds.
    pub namespace: String,
    /// What happened, e.g. `Created`, `Updated` or `Deleted`.
    pub reason: String,
}

impl Event {
    /// Creates an event from its four identifying fields.
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }

    /// Returns the human-readable description sent to chat-like sinks.
    ///
    /// Cluster scoped kinds omit the namespace:
    ///
    /// ```
    /// use kubewatch_core::Event;
    ///
    /// let event = Event::new("namespace", "staging", "", "Created");
    /// assert_eq!(event.message(), "A namespace `staging` has been `Created`");
    /// ```
    pub fn message(&self) -> String {
        if self.is_cluster_scoped() {
            format!("A {} `{}` has been `{}`", self.kind, self.name, self.reason)
        } else {
            format!(
                "A `{}` in namespace `{}` has been `{}`:\n`{}`",
                self.kind, self.namespace, self.reason, self.name
            )
        }
    }

    fn is_cluster_scoped(&self) -> bool {
        CLUSTER_SCOPED_KINDS.contains(&self.kind.as_str())
    }
}
