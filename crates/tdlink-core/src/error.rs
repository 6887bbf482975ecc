//! Error types for tdlink.
//!
//! Every failure a caller can observe from the dispatcher, the decoder or a
//! typed operation is a variant of [`TdError`]. Malformed inbound messages are
//! dropped by the receive loop and never reach this type.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the tdlink library.
#[derive(Debug, Error)]
pub enum TdError {
    // Dispatch errors
    #[error("Request {token} timed out after {after:?}")]
    Timeout { token: String, after: Duration },

    #[error("Client is closed")]
    Closed,

    #[error("Transport error: {message}")]
    Transport { message: String },

    // Decode errors
    #[error("Unknown {category} variant: {kind}")]
    UnknownVariant {
        category: &'static str,
        kind: String,
    },

    #[error("Message has no @type discriminator (expected {category})")]
    MissingDiscriminator { category: &'static str },

    #[error("Malformed message: {message}")]
    Malformed { message: String },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Remote errors
    #[error("Remote error {code}: {message}")]
    Remote { code: i32, message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for tdlink operations.
pub type Result<T> = std::result::Result<T, TdError>;

impl From<serde_json::Error> for TdError {
    fn from(err: serde_json::Error) -> Self {
        TdError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl TdError {
    /// Create a transport error from anything printable.
    pub fn transport(message: impl Into<String>) -> Self {
        TdError::Transport {
            message: message.into(),
        }
    }

    /// Numeric code of a remote error, if this is one.
    pub fn code(&self) -> Option<i32> {
        match self {
            TdError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this error could succeed on a fresh attempt.
    ///
    /// The core never retries on its own; this only informs caller policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TdError::Timeout { .. } | TdError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TdError::UnknownVariant {
            category: "OptionValue",
            kind: "optionValueFloat".into(),
        };
        assert_eq!(err.to_string(), "Unknown OptionValue variant: optionValueFloat");

        let err = TdError::Remote {
            code: 400,
            message: "USERNAME_INVALID".into(),
        };
        assert_eq!(err.to_string(), "Remote error 400: USERNAME_INVALID");
    }

    #[test]
    fn test_remote_code() {
        let err = TdError::Remote {
            code: 429,
            message: "Too Many Requests".into(),
        };
        assert_eq!(err.code(), Some(429));
        assert_eq!(TdError::Closed.code(), None);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(TdError::Timeout {
            token: "abc".into(),
            after: Duration::from_secs(10),
        }
        .is_retryable());
        assert!(TdError::transport("send failed").is_retryable());
        assert!(!TdError::Remote {
            code: 400,
            message: "Bad Request".into()
        }
        .is_retryable());
        assert!(!TdError::Closed.is_retryable());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: TdError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, TdError::Json { source: Some(_), .. }));
    }
}
