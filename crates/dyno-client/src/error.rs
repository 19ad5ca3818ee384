//! Errors surfaced by the client.
//!
//! Every failure is returned to the caller as-is; nothing here retries.

use dyno_auth::{CredentialsError, SignatureError};
use dyno_model::{DecodeError, EncodeError, ServiceErrorCode};

/// Any failure while building, sending, or decoding a request.
#[derive(Debug, thiserror::Error)]
pub enum DynoError {
    /// The request could not be signed.
    #[error("failed to sign request: {0}")]
    Signature(#[from] SignatureError),

    /// Credentials could not be loaded.
    #[error("failed to load credentials: {0}")]
    Credentials(#[from] CredentialsError),

    /// A value could not be encoded as an attribute value.
    #[error("failed to encode item: {0}")]
    Encode(#[from] EncodeError),

    /// A response or item could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] DecodeError),

    /// The service answered with a status outside 200..=299 and a body that
    /// is not a service error document.
    #[error("invalid response (status {status}): {body}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The service reported an error.
    #[error("{code}: {message}")]
    Service {
        /// Parsed error code.
        code: ServiceErrorCode,
        /// Error message from the service.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request could not be delivered.
    #[error("network error: {0}")]
    Network(String),

    /// The client is misconfigured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DynoError {
    /// The service error code, if this is a service error.
    #[must_use]
    pub fn service_code(&self) -> Option<&ServiceErrorCode> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DynoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(DecodeError::Json(err))
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, DynoError>;
