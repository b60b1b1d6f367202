//! Webhook notification sink for kubewatch.
//!
//! Posts each watch event as a JSON envelope to a configured endpoint,
//! optionally signed with HMAC-SHA256 so the receiver can verify where the
//! payload came from.
//!
//! # Wire format
//!
//! ```text
//! POST <url>
//! Content-Type: application/json
//! X-KubeWatch-Signature: <hex hmac-sha256 of body>     (only when keyed)
//!
//! {"eventmeta":{"kind":..,"name":..,"namespace":..,"reason":..},"text":..,"time":..}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kubewatch_core::{Event, Handler};
//! use kubewatch_webhook::{env::ProcessEnv, Config, Webhook, WebhookError};
//!
//! # async fn example() -> std::result::Result<(), WebhookError> {
//! let config = Config::default();
//! let webhook = Webhook::from_config(&config, &ProcessEnv)?;
//!
//! webhook.handle(&Event::new("Pod", "nginx-1", "default", "Created")).await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod handler;
pub mod message;
pub mod reporter;
pub mod signing;

pub use config::{Config, WebhookConfig, WebhookSink, DEFAULT_SIGNATURE_HEADER};
pub use error::{ConfigError, ErrorCategory, Result, WebhookError};
pub use handler::{Delivery, Webhook};
pub use reporter::{DeliveryReport, DeliveryReporter, TracingReporter};
pub use signing::SigningKey;
