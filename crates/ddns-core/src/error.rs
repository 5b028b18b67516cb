//! Error types for the DDNS updater
//!
//! Every failure after startup is logged by the engine and the tick is
//! abandoned; only [`Error::Config`] is fatal, and only at startup.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a provider rejects a request without listing any errors
pub const UNKNOWN_API_ERROR: &str = "no error details returned";

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The IP echo service returned something unusable
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Request could not be sent or its body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status from the provider API
    #[error("HTTP error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// First error message from the response envelope
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed response that does not carry what the caller needs
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an API error from a status code and the provider's error messages
    ///
    /// Only the first message is kept. An empty list yields [`UNKNOWN_API_ERROR`].
    pub fn api<'a>(status: u16, mut messages: impl Iterator<Item = &'a str>) -> Self {
        Self::Api {
            status,
            message: messages.next().unwrap_or(UNKNOWN_API_ERROR).to_string(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_first_message() {
        let err = Error::api(403, ["Authentication error", "second"].into_iter());
        match &err {
            Error::Api { status, message } => {
                assert_eq!(*status, 403);
                assert_eq!(message, "Authentication error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "HTTP error 403: Authentication error");
    }

    #[test]
    fn test_api_error_without_messages() {
        let err = Error::api(500, std::iter::empty());
        assert!(err.to_string().ends_with(UNKNOWN_API_ERROR));
    }
}
