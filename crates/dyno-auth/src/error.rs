//! Error types for request signing and credential loading.

use std::path::PathBuf;

/// Errors raised while producing a request signature.
///
/// Both are surfaced before any network call is attempted.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// No usable secret key could be obtained.
    #[error("couldn't read secret key")]
    CouldntReadSecretKey,

    /// The HMAC key chain could not be derived.
    #[error("couldn't calculate signing key")]
    CouldntCalculateSigningKey,
}

/// Errors raised while resolving credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    /// A credentials file could not be read.
    #[error("failed to read credentials file {path}: {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The credential bytes are not valid UTF-8.
    #[error("credentials are not valid UTF-8")]
    InvalidUtf8,

    /// A required key is absent from the credentials document.
    #[error("credentials are missing {0}")]
    MissingField(&'static str),

    /// No source yielded credentials.
    #[error("no credentials found in bytes, file, environment or ~/.aws/credentials")]
    NotFound,
}

impl From<CredentialsError> for SignatureError {
    fn from(_: CredentialsError) -> Self {
        Self::CouldntReadSecretKey
    }
}
