//! Delivery outcome reporting.
//!
//! The webhook handler never returns errors to the watch pipeline. Instead
//! every outcome is handed to a [`DeliveryReporter`], which by default turns
//! it into a log line. Tests inject their own reporter to observe outcomes.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::ErrorCategory;

/// Outcome of one webhook dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The endpoint received the notification.
    Sent {
        /// Endpoint the message was posted to.
        url: String,
        /// HTTP status the endpoint answered with.
        status_code: u16,
        /// When the request completed.
        sent_at: DateTime<Utc>,
    },

    /// The notification was dropped.
    Failed {
        /// Endpoint the message was meant for.
        url: String,
        /// Which stage failed.
        category: ErrorCategory,
        /// Raw error text.
        error: String,
    },
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { url, sent_at, .. } => {
                write!(f, "Message successfully sent to {} at {}", url, sent_at.to_rfc3339())
            },
            Self::Failed { error, .. } => f.write_str(error),
        }
    }
}

/// Receives the outcome of every dispatch.
pub trait DeliveryReporter: Send + Sync + std::fmt::Debug {
    /// Records `report`. Must not block for long or fail.
    fn report(&self, report: &DeliveryReport);
}

/// Reporter that writes outcomes to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DeliveryReporter for TracingReporter {
    fn report(&self, report: &DeliveryReport) {
        match report {
            DeliveryReport::Sent { url, status_code, .. } => {
                tracing::info!(url = %url, status = status_code, "{}", report);
            },
            DeliveryReport::Failed { url, category, .. } => {
                tracing::error!(url = %url, category = %category, "{}", report);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn sent_report_names_endpoint_and_time() {
        let report = DeliveryReport::Sent {
            url: "http://hooks.test/kubewatch".to_string(),
            status_code: 200,
            sent_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap(),
        };

        assert_eq!(
            report.to_string(),
            "Message successfully sent to http://hooks.test/kubewatch at 2024-03-01T12:00:05+00:00"
        );
    }

    #[test]
    fn failed_report_is_raw_error_text() {
        let report = DeliveryReport::Failed {
            url: "http://hooks.test/kubewatch".to_string(),
            category: ErrorCategory::Transport,
            error: "error sending request for url (http://hooks.test/kubewatch)".to_string(),
        };

        assert_eq!(
            report.to_string(),
            "error sending request for url (http://hooks.test/kubewatch)"
        );
    }

    #[test]
    fn tracing_reporter_accepts_both_outcomes() {
        let reporter = TracingReporter;
        reporter.report(&DeliveryReport::Failed {
            url: "http://hooks.test".to_string(),
            category: ErrorCategory::Serialization,
            error: "boom".to_string(),
        });
        reporter.report(&DeliveryReport::Sent {
            url: "http://hooks.test".to_string(),
            status_code: 204,
            sent_at: Utc::now(),
        });
    }
}
