//! Error types for webhook configuration and dispatch.
//!
//! [`ConfigError`] is fatal at startup and stops the sink from being
//! activated. [`WebhookError`] covers a single dispatch; the handler logs it
//! and moves on to the next event.

use std::fmt;

use thiserror::Error;

/// Result type alias for webhook operations.
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Invalid or incomplete webhook configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No endpoint URL in the configuration or the environment.
    #[error(
        "missing webhook url: set it using \"--url/-u\" or export KW_WEBHOOK_URL=webhook_url \
         (command line flags override environment variables)"
    )]
    MissingUrl,

    /// The HMAC key is not valid standard base64.
    #[error("invalid webhook hmac key: {0}")]
    InvalidHmacKey(#[from] base64::DecodeError),
}

/// Failure while dispatching a single notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Sink configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The envelope could not be encoded as JSON.
    #[error("failed to serialize webhook message: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Building or sending the HTTP request failed.
    #[error("{message}")]
    Transport {
        /// Error text from the HTTP client
        message: String,
    },
}

impl WebhookError {
    /// Creates a transport error from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Returns the category of this error for structured logs.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from(self)
    }
}

/// Coarse classification of webhook errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration problems.
    Configuration,
    /// JSON encoding of the envelope.
    Serialization,
    /// Request construction or network failure.
    Transport,
}

impl From<&WebhookError> for ErrorCategory {
    fn from(error: &WebhookError) -> Self {
        match error {
            WebhookError::Config(_) => Self::Configuration,
            WebhookError::Serialization(_) => Self::Serialization,
            WebhookError::Transport { .. } => Self::Transport,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Serialization => write!(f, "serialization"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    #[test]
    fn missing_url_tells_operator_how_to_fix_it() {
        let message = ConfigError::MissingUrl.to_string();

        assert!(message.contains("--url/-u"));
        assert!(message.contains("KW_WEBHOOK_URL"));
    }

    #[test]
    fn decode_failure_detail_is_kept() {
        let decode_error =
            base64::engine::general_purpose::STANDARD.decode("not base64!").unwrap_err();
        let detail = decode_error.to_string();

        let error = ConfigError::from(decode_error);

        assert!(error.to_string().contains(&detail));
    }

    #[test]
    fn categories_mapped_correctly() {
        assert_eq!(
            WebhookError::from(ConfigError::MissingUrl).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            WebhookError::transport("connection refused").category(),
            ErrorCategory::Transport
        );

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(WebhookError::from(json_error).category(), ErrorCategory::Serialization);
    }

    #[test]
    fn transport_error_displays_raw_text() {
        let error = WebhookError::transport("error sending request for url (http://x/)");
        assert_eq!(error.to_string(), "error sending request for url (http://x/)");
        assert_eq!(error.category().to_string(), "transport");
    }
}
