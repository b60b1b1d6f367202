//! Environment variable lookup used as a configuration fallback.

use std::collections::HashMap;

/// Endpoint URL fallback.
pub const ENV_URL: &str = "KW_WEBHOOK_URL";
/// Base64 encoded HMAC key fallback.
pub const ENV_HMAC_KEY: &str = "KW_WEBHOOK_HMAC_KEY";
/// Signature header name fallback.
pub const ENV_HMAC_SIGNATURE_HEADER: &str = "KW_WEBHOOK_HMAC_SIGNATURE_HEADER";

/// Read access to environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset or not unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment.
///
/// ```
/// use kubewatch_webhook::env::{EnvSource, MapEnv, ENV_URL};
///
/// let env = MapEnv::new().with(ENV_URL, "http://hooks.internal/kubewatch");
/// assert_eq!(env.var(ENV_URL).as_deref(), Some("http://hooks.internal/kubewatch"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the environment with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
