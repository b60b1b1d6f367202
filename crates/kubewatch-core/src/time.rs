//! Clock abstraction for timestamping outbound notifications.
//!
//! Production code uses [`SystemClock`]; tests inject a [`TestClock`] to get
//! stable timestamps in payloads and reports.

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};

/// Source of wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep a handle and
/// advance the clock it gave to the code under test.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// Nanoseconds since the UNIX epoch.
    now_ns: Arc<AtomicI64>,
}

impl TestClock {
    /// Creates a test clock frozen at the current system time.
    pub fn new() -> Self {
        Self::with_start_time(Utc::now())
    }

    /// Creates a test clock frozen at `start`.
    pub fn with_start_time(start: DateTime<Utc>) -> Self {
        Self { now_ns: Arc::new(AtomicI64::new(to_nanos(start))) }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let delta = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        self.now_ns.fetch_add(delta, Ordering::AcqRel);
    }

    /// Sets the clock to `time`, which may be in the past.
    pub fn jump_to(&self, time: DateTime<Utc>) {
        self.now_ns.store(to_nanos(time), Ordering::Release);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.now_ns.load(Ordering::Acquire))
    }
}

fn to_nanos(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
