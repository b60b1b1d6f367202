//! Reporter that keeps delivery outcomes in memory.

use std::sync::{Arc, Mutex};

use kubewatch_webhook::{DeliveryReport, DeliveryReporter};

/// Records every delivery report for later assertions.
///
/// Clones share the same record, so a test can keep one handle and give
/// another to the handler under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<DeliveryReport>>>,
}

impl RecordingReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all reports recorded so far.
    pub fn reports(&self) -> Vec<DeliveryReport> {
        self.lock().clone()
    }

    /// Number of successful deliveries recorded.
    pub fn sent_count(&self) -> usize {
        self.lock().iter().filter(|report| matches!(report, DeliveryReport::Sent { .. })).count()
    }

    /// Number of failed deliveries recorded.
    pub fn failed_count(&self) -> usize {
        self.lock().iter().filter(|report| matches!(report, DeliveryReport::Failed { .. })).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DeliveryReport>> {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DeliveryReporter for RecordingReporter {
    fn report(&self, report: &DeliveryReport) {
        self.lock().push(report.clone());
    }
}
