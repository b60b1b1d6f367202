//! Webhook sink configuration.
//!
//! Raw settings come from the kubewatch configuration file
//! (`handler.webhook.*`). Each field is then resolved against an ordered
//! list of sources, first non-empty value wins:
//!
//! | Field                   | Sources, in order                                         |
//! |-------------------------|-----------------------------------------------------------|
//! | `url`                   | config, `KW_WEBHOOK_URL`                                  |
//! | `hmacKey`               | config, `KW_WEBHOOK_HMAC_KEY`                             |
//! | `hmacSignatureHeader`   | config, `KW_WEBHOOK_HMAC_SIGNATURE_HEADER`, default       |
//!
//! The result is an immutable [`WebhookSink`] that every dispatch reads.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientConfig,
    env::{EnvSource, ENV_HMAC_KEY, ENV_HMAC_SIGNATURE_HEADER, ENV_URL},
    error::ConfigError,
    signing::SigningKey,
};

/// Header carrying the payload signature when none is configured.
pub const DEFAULT_SIGNATURE_HEADER: &str = "X-KubeWatch-Signature";

/// Top level kubewatch configuration, as far as this sink is concerned.
///
/// # Example
///
/// ```no_run
/// use kubewatch_webhook::Config;
///
/// let config = Config::load(".kubewatch.yaml").expect("failed to load configuration");
/// println!("webhook url: {}", config.handler.webhook.url);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-sink handler settings.
    pub handler: HandlerConfig,
}

/// Handler section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Webhook sink settings.
    pub webhook: WebhookConfig,
}

/// Unresolved webhook settings. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Endpoint receiving the notifications.
    pub url: String,
    /// Standard base64 encoded HMAC key.
    pub hmac_key: String,
    /// Name of the header carrying the signature.
    pub hmac_signature_header: String,
    /// Optional request timeout. Unset or zero means requests may wait
    /// indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Loads configuration from built-in defaults and an optional YAML file.
    ///
    /// A missing file is not an error; every field then keeps its default
    /// and resolution falls back to the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::figment(path)
            .extract()
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    }

    /// Returns the provider stack used by [`Config::load`].
    pub fn figment(path: &Path) -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default())).merge(Yaml::file(path))
    }

    /// Converts the webhook settings to HTTP client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: self
                .handler
                .webhook
                .timeout_seconds
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs),
            ..ClientConfig::default()
        }
    }
}

/// Returns the first source holding a non-empty value.
///
/// ```
/// use kubewatch_webhook::config::first_present;
///
/// assert_eq!(first_present(&[Some(""), None, Some("b"), Some("c")]), Some("b".to_string()));
/// assert_eq!(first_present(&[None, Some("")]), None);
/// ```
pub fn first_present(sources: &[Option<&str>]) -> Option<String> {
    sources.iter().flatten().find(|value| !value.is_empty()).map(|value| (*value).to_string())
}

/// A resolved, validated webhook destination.
///
/// Created once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    url: String,
    signing_key: Option<SigningKey>,
    signature_header: String,
}

impl WebhookSink {
    /// Creates an unsigned sink for `url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingUrl` if `url` is empty.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        Ok(Self {
            url,
            signing_key: None,
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
        })
    }

    /// Resolves raw settings against the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHmacKey` if the key is not valid base64,
    /// and `ConfigError::MissingUrl` if no source provides a URL.
    pub fn resolve(config: &WebhookConfig, env: &impl EnvSource) -> Result<Self, ConfigError> {
        let env_url = env.var(ENV_URL);
        let env_key = env.var(ENV_HMAC_KEY);
        let env_header = env.var(ENV_HMAC_SIGNATURE_HEADER);

        let url = first_present(&[Some(config.url.as_str()), env_url.as_deref()]);
        let encoded_key = first_present(&[Some(config.hmac_key.as_str()), env_key.as_deref()]);
        let signature_header = resolve_signature_header(
            &config.hmac_signature_header,
            env_header.as_deref(),
        );

        let signing_key = match encoded_key {
            Some(encoded) => decode_signing_key(&encoded)?,
            None => None,
        };

        let sink = Self::new(url.unwrap_or_default())?;
        Ok(Self { signing_key, signature_header, ..sink })
    }

    /// Returns the sink with payload signing enabled.
    #[must_use]
    pub fn with_signing_key(mut self, key: SigningKey) -> Self {
        self.signing_key = Some(key);
        self
    }

    /// Returns the sink with a custom signature header name.
    #[must_use]
    pub fn with_signature_header(mut self, header: impl Into<String>) -> Self {
        self.signature_header = header.into();
        self
    }

    /// Endpoint receiving the notifications.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Key used to sign payloads, if signing is enabled.
    pub fn signing_key(&self) -> Option<&SigningKey> {
        self.signing_key.as_ref()
    }

    /// Name of the header carrying the signature.
    pub fn signature_header(&self) -> &str {
        &self.signature_header
    }
}

/// Resolves the signature header name, falling back to
/// [`DEFAULT_SIGNATURE_HEADER`].
pub fn resolve_signature_header(configured: &str, from_env: Option<&str>) -> String {
    first_present(&[Some(configured), from_env, Some(DEFAULT_SIGNATURE_HEADER)])
        .unwrap_or_else(|| DEFAULT_SIGNATURE_HEADER.to_string())
}

/// Decodes a base64 key. An empty decoded key disables signing.
fn decode_signing_key(encoded: &str) -> Result<Option<SigningKey>, ConfigError> {
    let key = STANDARD.decode(encoded)?;
    if key.is_empty() {
        return Ok(None);
    }
    Ok(Some(SigningKey::new(&key)))
}
