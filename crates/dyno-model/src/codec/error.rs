//! Encode and decode errors for the attribute value codec.

use std::fmt;

/// Errors raised while turning a Rust value into an [`AttributeValue`].
///
/// [`AttributeValue`]: crate::AttributeValue
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Map keys must serialize to strings.
    #[error("map key must be a string, found {0}")]
    KeyMustBeAString(&'static str),

    /// NaN and infinities have no DynamoDB number representation.
    #[error("cannot encode non-finite number {0}")]
    NonFiniteNumber(String),

    /// The top-level value did not encode to a map, so it cannot be stored as an item.
    #[error("an item must encode to a map, found {0}")]
    NotAnItem(&'static str),

    /// Error raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Errors raised while turning an [`AttributeValue`] back into a Rust value.
///
/// Every variant that concerns a particular attribute carries the dotted path
/// to it (`colours[1]`, `discovery.date`); the empty path is the item itself.
///
/// [`AttributeValue`]: crate::AttributeValue
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A required field was absent from the map.
    #[error("missing field `{field}` at `{path}`")]
    MissingField {
        /// Path of the map that lacked the field.
        path: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The attribute had a different type than the target expects.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the offending attribute.
        path: String,
        /// What the target type wanted.
        expected: String,
        /// What was actually there (type descriptor or value description).
        found: String,
    },

    /// A number string could not be parsed into the target numeric type.
    #[error("invalid number {value:?} at `{path}` for {target}")]
    InvalidNumber {
        /// Path of the offending attribute.
        path: String,
        /// The raw number string.
        value: String,
        /// Name of the target numeric type.
        target: &'static str,
    },

    /// Error raised by a `Deserialize` implementation.
    #[error("{message} at `{path}`")]
    Custom {
        /// Path of the offending attribute.
        path: String,
        /// Message from the deserializer.
        message: String,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: String::new(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid_number(value: &str, target: &'static str) -> Self {
        Self::InvalidNumber {
            path: String::new(),
            value: value.to_owned(),
            target,
        }
    }

    /// Returns the path carried by this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidNumber { path, .. }
            | Self::Custom { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }

    /// Prefix the error's path with a map key.
    pub(crate) fn in_field(self, key: &str) -> Self {
        self.prefixed(|path| {
            if path.is_empty() {
                key.to_owned()
            } else if path.starts_with('[') {
                format!("{key}{path}")
            } else {
                format!("{key}.{path}")
            }
        })
    }

    /// Prefix the error's path with a list index.
    pub(crate) fn in_element(self, index: usize) -> Self {
        self.prefixed(|path| {
            if path.is_empty() || path.starts_with('[') {
                format!("[{index}]{path}")
            } else {
                format!("[{index}].{path}")
            }
        })
    }

    fn prefixed(mut self, f: impl FnOnce(&str) -> String) -> Self {
        match &mut self {
            Self::MissingField { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidNumber { path, .. }
            | Self::Custom { path, .. } => *path = f(path),
            Self::Json(_) => {}
        }
        self
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom {
            path: String::new(),
            message: msg.to_string(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Self::type_mismatch(exp.to_string(), unexp.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self::MissingField {
            path: String::new(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_nested_paths() {
        let err = DecodeError::type_mismatch("BOOL", "S")
            .in_field("name")
            .in_element(1)
            .in_field("colours");
        assert_eq!(err.path(), Some("colours[1].name"));
    }

    #[test]
    fn test_should_prefix_missing_field_path() {
        let err = <DecodeError as serde::de::Error>::missing_field("teeth").in_field("dino");
        assert!(matches!(
            err,
            DecodeError::MissingField { ref path, field: "teeth" } if path == "dino"
        ));
        assert_eq!(err.to_string(), "missing field `teeth` at `dino`");
    }
}
