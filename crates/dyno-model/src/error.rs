//! Service error documents.
//!
//! Failed requests carry a JSON body with a `__type` field holding the
//! fully-qualified error type name (`com.amazonaws.dynamodb.v20120810#...`)
//! and a `message` (sometimes `Message`) field.

use std::fmt;

use serde::Deserialize;

/// Well-known service error codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ServiceErrorCode {
    /// Table already exists or is being modified.
    ResourceInUseException,
    /// Table not found.
    ResourceNotFoundException,
    /// Condition check failed.
    ConditionalCheckFailedException,
    /// Item collection size limit exceeded.
    ItemCollectionSizeLimitExceededException,
    /// Provisioned throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Request limit exceeded.
    RequestLimitExceeded,
    /// Request throttled.
    ThrottlingException,
    /// Validation error.
    ValidationException,
    /// Serialization error.
    SerializationException,
    /// Internal server error.
    InternalServerError,
    /// Missing action.
    MissingAction,
    /// Access denied.
    AccessDeniedException,
    /// Unknown access key or operation.
    UnrecognizedClientException,
    /// The request signature did not match.
    InvalidSignatureException,
    /// Any code not listed above, kept verbatim.
    Other(String),
}

impl ServiceErrorCode {
    /// Parse a `__type` value. Everything up to and including the last `#` is
    /// a namespace and is ignored.
    #[must_use]
    pub fn from_type(error_type: &str) -> Self {
        let code = error_type
            .rsplit_once('#')
            .map_or(error_type, |(_, code)| code);
        match code {
            "ResourceInUseException" => Self::ResourceInUseException,
            "ResourceNotFoundException" => Self::ResourceNotFoundException,
            "ConditionalCheckFailedException" => Self::ConditionalCheckFailedException,
            "ItemCollectionSizeLimitExceededException" => {
                Self::ItemCollectionSizeLimitExceededException
            }
            "ProvisionedThroughputExceededException" => {
                Self::ProvisionedThroughputExceededException
            }
            "RequestLimitExceeded" => Self::RequestLimitExceeded,
            "ThrottlingException" => Self::ThrottlingException,
            "ValidationException" => Self::ValidationException,
            "SerializationException" => Self::SerializationException,
            "InternalServerError" => Self::InternalServerError,
            "MissingAction" => Self::MissingAction,
            "AccessDeniedException" => Self::AccessDeniedException,
            "UnrecognizedClientException" => Self::UnrecognizedClientException,
            "InvalidSignatureException" => Self::InvalidSignatureException,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ResourceInUseException => "ResourceInUseException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ItemCollectionSizeLimitExceededException => {
                "ItemCollectionSizeLimitExceededException"
            }
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::ThrottlingException => "ThrottlingException",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::MissingAction => "MissingAction",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::InvalidSignatureException => "InvalidSignatureException",
            Self::Other(code) => code,
        }
    }

    /// Returns `true` for capacity and throttling errors the caller may retry.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::RequestLimitExceeded
                | Self::ThrottlingException
        )
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The JSON body of a failed request.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    /// Fully-qualified error type.
    #[serde(rename = "__type")]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default, alias = "Message")]
    pub message: String,
}

impl ServiceErrorBody {
    /// Parse a response body, returning `None` if it is not an error document.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The parsed error code.
    #[must_use]
    pub fn code(&self) -> ServiceErrorCode {
        ServiceErrorCode::from_type(&self.error_type)
    }
}
