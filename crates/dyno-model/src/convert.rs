//! Conversions from native Rust values into [`AttributeValue`].
//!
//! These are the "convertible values" accepted wherever a literal appears in a
//! condition, e.g. `Condition::compare("teeth", Comparator::Ge, 40)`.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;

use crate::attribute_value::AttributeValue;

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<&String> for AttributeValue {
    fn from(value: &String) -> Self {
        Self::S(value.clone())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for AttributeValue {
    fn from(value: Bytes) -> Self {
        Self::B(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::B(Bytes::from(value))
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(value: &[u8]) -> Self {
        Self::B(Bytes::copy_from_slice(value))
    }
}

macro_rules! number_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::N(value.to_string())
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// Rust's float `Display` is the shortest string that parses back to the same
// value, and never uses locale-specific separators.
number_from!(f32, f64);

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::L(value)
    }
}

impl<V: Into<AttributeValue>> From<HashMap<String, V>> for AttributeValue {
    fn from(value: HashMap<String, V>) -> Self {
        Self::M(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl AttributeValue {
    /// Build a string set.
    pub fn string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ss(values.into_iter().map(Into::into).collect())
    }

    /// Build a number set, stringifying each element independently.
    pub fn number_set<I, N>(values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: ToString,
    {
        Self::Ns(values.into_iter().map(|n| n.to_string()).collect())
    }

    /// Strip the type descriptors and return plain JSON.
    ///
    /// Numbers become JSON numbers when they fit one, otherwise they stay
    /// strings so no precision is lost. Binary values become base64 strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::S(s) => Value::String(s.clone()),
            Self::N(n) => number_to_json(n),
            Self::B(b) => Value::String(BASE64.encode(b)),
            Self::Ss(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
            Self::Ns(v) => Value::Array(v.iter().map(|n| number_to_json(n)).collect()),
            Self::Bs(v) => Value::Array(
                v.iter()
                    .map(|b| Value::String(BASE64.encode(b)))
                    .collect(),
            ),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null(_) => Value::Null,
            Self::L(list) => Value::Array(list.iter().map(Self::to_json).collect()),
            Self::M(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
        }
    }

    /// Add type descriptors to plain JSON.
    ///
    /// Arrays always become lists; use [`AttributeValue::string_set`] and
    /// friends when a set is wanted.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::null(),
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::N(n.to_string()),
            Value::String(s) => Self::S(s.clone()),
            Value::Array(items) => Self::L(items.iter().map(Self::from_json).collect()),
            Value::Object(m) => Self::M(
                m.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: &str) -> serde_json::Value {
    if let Ok(i) = n.parse::<i64>() {
        return i.into();
    }
    if let Ok(u) = n.parse::<u64>() {
        return u.into();
    }
    n.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| serde_json::Value::String(n.to_owned()), Into::into)
}
