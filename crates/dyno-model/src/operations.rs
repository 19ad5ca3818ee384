//! Operations Dyno issues against the service.

use std::fmt;

/// Target prefix for the `X-Amz-Target` header.
pub const TARGET_PREFIX: &str = "DynamoDB_20120810";

/// Operation names sent in `X-Amz-Target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DynoOperation {
    CreateTable,
    DeleteTable,
    DescribeTable,
    PutItem,
    GetItem,
    DeleteItem,
    Scan,
}

impl DynoOperation {
    /// Bare operation name, also used as the tracing field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::DeleteTable => "DeleteTable",
            Self::DescribeTable => "DescribeTable",
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
            Self::DeleteItem => "DeleteItem",
            Self::Scan => "Scan",
        }
    }

    /// The `X-Amz-Target` header value, e.g. `DynamoDB_20120810.Scan`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{TARGET_PREFIX}.{}", self.as_str())
    }
}

impl fmt::Display for DynoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
