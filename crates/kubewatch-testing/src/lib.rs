//! Test fixtures and HTTP mocks for kubewatch.
//!
//! Provides event builders, a reporter that records delivery outcomes, and a
//! mock webhook endpoint that captures what it receives.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod endpoint;
pub mod fixtures;
pub mod reporter;

pub use endpoint::{MockEndpoint, ReceivedWebhook};
pub use fixtures::{base64_key, unreachable_url, EventBuilder};
pub use kubewatch_core::TestClock;
pub use reporter::RecordingReporter;
