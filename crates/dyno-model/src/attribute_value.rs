//! The typed value envelope used on the wire.
//!
//! Every value is a one-key JSON object whose key names the type:
//! `{"S": "Joe"}`, `{"N": "40"}`, `{"BOOL": true}`. Numbers stay strings so
//! no precision is lost in transit. `B` and `BS` carry standard base64.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stored item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

const TYPE_TAGS: &[&str] = &["S", "N", "B", "SS", "NS", "BS", "BOOL", "NULL", "L", "M"];

/// One attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// `S`
    S(String),
    /// `N`, kept as the decimal text the service sent.
    N(String),
    /// `B`
    B(Bytes),
    /// `SS`
    Ss(Vec<String>),
    /// `NS`
    Ns(Vec<String>),
    /// `BS`
    Bs(Vec<Bytes>),
    /// `BOOL`
    Bool(bool),
    /// `NULL`. The service only ever sends `true`.
    Null(bool),
    /// `L`: heterogeneous list.
    L(Vec<AttributeValue>),
    /// `M`: nested document.
    M(Item),
}

impl AttributeValue {
    /// `{"NULL": true}`.
    #[must_use]
    pub fn null() -> Self {
        Self::Null(true)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(true))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_s(&self) -> bool {
        matches!(self, Self::S(_))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_n(&self) -> bool {
        matches!(self, Self::N(_))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_b(&self) -> bool {
        matches!(self, Self::B(_))
    }

    /// `SS`, `NS` or `BS`.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Ss(_) | Self::Ns(_) | Self::Bs(_))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_l(&self) -> bool {
        matches!(self, Self::L(_))
    }

    /// The text of an `S`.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        if let Self::S(s) = self { Some(s) } else { None }
    }

    /// The decimal text of an `N`.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        if let Self::N(n) = self { Some(n) } else { None }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self { Some(*b) } else { None }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        if let Self::L(list) = self { Some(list) } else { None }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn as_m(&self) -> Option<&Item> {
        if let Self::M(map) = self { Some(map) } else { None }
    }

    /// Unwrap an `M` into the item it holds.
    #[must_use]
    pub fn into_m(self) -> Option<Item> {
        if let Self::M(map) = self { Some(map) } else { None }
    }

    /// The wire tag, `"S"` through `"M"`.
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        let index = match self {
            Self::S(_) => 0,
            Self::N(_) => 1,
            Self::B(_) => 2,
            Self::Ss(_) => 3,
            Self::Ns(_) => 4,
            Self::Bs(_) => 5,
            Self::Bool(_) => 6,
            Self::Null(_) => 7,
            Self::L(_) => 8,
            Self::M(_) => 9,
        };
        TYPE_TAGS[index]
    }
}

impl Eq for AttributeValue {}

impl std::hash::Hash for AttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::S(s) | Self::N(s) => s.hash(state),
            Self::B(b) => b.hash(state),
            Self::Bool(b) | Self::Null(b) => b.hash(state),
            Self::Ss(v) | Self::Ns(v) => v.hash(state),
            Self::Bs(v) => v.hash(state),
            Self::L(v) => v.hash(state),
            Self::M(m) => {
                let mut keys: Vec<&String> = m.keys().collect();
                keys.sort_unstable();
                for key in keys {
                    key.hash(state);
                    m[key].hash(state);
                }
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    /// Renders the value with its type tag and literal, e.g. `N("40")` or
    /// `SS(["green", "aqua"])`. Binary payloads are shown by length only and
    /// map keys are sorted so the output is stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "S({s:?})"),
            Self::N(n) => write!(f, "N({n:?})"),
            Self::B(b) => write!(f, "B(<{} bytes>)", b.len()),
            Self::Ss(v) => write!(f, "SS({v:?})"),
            Self::Ns(v) => write!(f, "NS({v:?})"),
            Self::Bs(v) => write!(f, "BS(<{} items>)", v.len()),
            Self::Bool(b) => write!(f, "BOOL({b})"),
            Self::Null(_) => f.write_str("NULL"),
            Self::L(list) => {
                f.write_str("L([")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("])")
            }
            Self::M(m) => {
                let mut pairs: Vec<_> = m.iter().collect();
                pairs.sort_by_key(|(k, _)| *k);
                f.write_str("M({")?;
                for (i, (key, value)) in pairs.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("})")
            }
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.type_descriptor();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::S(text) | Self::N(text) => map.serialize_entry(tag, text)?,
            Self::Ss(members) | Self::Ns(members) => map.serialize_entry(tag, members)?,
            Self::B(bytes) => map.serialize_entry(tag, &BASE64.encode(bytes))?,
            Self::Bs(members) => {
                let encoded: Vec<String> = members.iter().map(|b| BASE64.encode(b)).collect();
                map.serialize_entry(tag, &encoded)?;
            }
            Self::Bool(flag) | Self::Null(flag) => map.serialize_entry(tag, flag)?,
            Self::L(list) => map.serialize_entry(tag, list)?,
            Self::M(doc) => map.serialize_entry(tag, doc)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a single-key object such as {\"S\": \"...\"}")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let Some(tag) = map.next_key::<String>()? else {
            return Err(de::Error::custom("empty attribute value"));
        };

        let value = match tag.as_str() {
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "B" => {
                let encoded: String = map.next_value()?;
                AttributeValue::B(decode_base64(&encoded).map_err(de::Error::custom)?)
            }
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => {
                let encoded: Vec<String> = map.next_value()?;
                let members = encoded
                    .iter()
                    .map(String::as_str)
                    .map(decode_base64)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(de::Error::custom)?;
                AttributeValue::Bs(members)
            }
            "BOOL" => AttributeValue::Bool(map.next_value()?),
            "NULL" => AttributeValue::Null(map.next_value()?),
            "L" => AttributeValue::L(map.next_value()?),
            "M" => AttributeValue::M(map.next_value()?),
            other => return Err(de::Error::unknown_field(other, TYPE_TAGS)),
        };

        match map.next_key::<String>()? {
            Some(extra) => Err(de::Error::custom(format!(
                "attribute value tagged both {tag} and {extra}"
            ))),
            None => Ok(value),
        }
    }
}

fn decode_base64(encoded: &str) -> Result<Bytes, base64::DecodeError> {
    BASE64.decode(encoded).map(Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(value: &AttributeValue) -> String {
        serde_json::to_string(value).unwrap()
    }

    #[test]
    fn test_should_write_scalars_as_tagged_objects() {
        assert_eq!(json(&AttributeValue::S("Joe".to_owned())), r#"{"S":"Joe"}"#);
        assert_eq!(json(&AttributeValue::N("40".to_owned())), r#"{"N":"40"}"#);
        assert_eq!(json(&AttributeValue::Bool(false)), r#"{"BOOL":false}"#);
        assert_eq!(json(&AttributeValue::null()), r#"{"NULL":true}"#);
    }

    #[test]
    fn test_should_base64_binary_payloads() {
        assert_eq!(
            json(&AttributeValue::B(Bytes::from_static(b"dino"))),
            r#"{"B":"ZGlubw=="}"#
        );
        let set = AttributeValue::Bs(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
        assert_eq!(json(&set), r#"{"BS":["YQ==","Yg=="]}"#);
        let back: AttributeValue = serde_json::from_str(r#"{"BS":["YQ==","Yg=="]}"#).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_should_read_nested_documents() {
        let value: AttributeValue = serde_json::from_str(
            r#"{"M": {"name": {"S": "Joe"}, "teeth": {"L": [{"N": "1"}, {"NS": ["2", "3"]}]}}}"#,
        )
        .unwrap();
        let doc = value.as_m().unwrap();
        assert_eq!(doc["name"].as_s(), Some("Joe"));
        let teeth = doc["teeth"].as_l().unwrap();
        assert_eq!(teeth[0].as_n(), Some("1"));
        assert!(teeth[1].is_set());
    }

    #[test]
    fn test_should_reject_malformed_envelopes() {
        for bad in [r#"{}"#, r#"{"X":"1"}"#, r#"{"S":"a","N":"1"}"#, r#"{"B":"***"}"#] {
            assert!(
                serde_json::from_str::<AttributeValue>(bad).is_err(),
                "{bad} should not decode"
            );
        }
    }

    #[test]
    fn test_should_classify_scalars() {
        assert!(AttributeValue::S("Joe".to_owned()).is_s());
        assert!(AttributeValue::N("40".to_owned()).is_n());
        assert!(AttributeValue::B(Bytes::from_static(b"x")).is_b());
        assert!(!AttributeValue::N("40".to_owned()).is_s());
    }

    #[test]
    fn test_should_display_with_type_tags() {
        assert_eq!(AttributeValue::N("40".to_owned()).to_string(), r#"N("40")"#);
        assert_eq!(
            AttributeValue::Ss(vec!["a".to_owned(), "b".to_owned()]).to_string(),
            r#"SS(["a", "b"])"#
        );
        assert_eq!(AttributeValue::null().to_string(), "NULL");
        let doc = Item::from([
            ("b".to_owned(), AttributeValue::Bool(true)),
            ("a".to_owned(), AttributeValue::N("1".to_owned())),
        ]);
        assert_eq!(
            AttributeValue::M(doc).to_string(),
            r#"M({"a": N("1"), "b": BOOL(true)})"#
        );
    }

    #[test]
    fn test_should_hash_maps_independently_of_insertion_order() {
        use std::collections::HashSet;

        let forward = Item::from([
            ("a".to_owned(), AttributeValue::N("1".to_owned())),
            ("b".to_owned(), AttributeValue::N("2".to_owned())),
        ]);
        let mut backward = Item::new();
        backward.insert("b".to_owned(), AttributeValue::N("2".to_owned()));
        backward.insert("a".to_owned(), AttributeValue::N("1".to_owned()));
        let set: HashSet<AttributeValue> =
            [AttributeValue::M(forward), AttributeValue::M(backward)].into();
        assert_eq!(set.len(), 1);
    }
}
