//! `serde::Deserializer` reading from borrowed [`AttributeValue`] trees.

use std::collections::HashMap;
use std::collections::hash_map;

use bytes::Bytes;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserializer as _, DeserializeSeed, Visitor};

use super::error::DecodeError;
use crate::attribute_value::AttributeValue;

/// How the members of a string-carrying set should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetKind {
    Strings,
    Numbers,
}

/// A borrowed view of one attribute value.
///
/// Set members are not `AttributeValue`s themselves, so sequences yield
/// nodes rather than values.
#[derive(Debug, Clone, Copy)]
enum Node<'de> {
    S(&'de str),
    N(&'de str),
    B(&'de [u8]),
    Bool(bool),
    Null,
    Strings(&'de [String], SetKind),
    Binaries(&'de [Bytes]),
    List(&'de [AttributeValue]),
    Map(&'de HashMap<String, AttributeValue>),
}

impl<'de> From<&'de AttributeValue> for Node<'de> {
    fn from(value: &'de AttributeValue) -> Self {
        match value {
            AttributeValue::S(s) => Self::S(s),
            AttributeValue::N(n) => Self::N(n),
            AttributeValue::B(b) => Self::B(b),
            AttributeValue::Ss(v) => Self::Strings(v, SetKind::Strings),
            AttributeValue::Ns(v) => Self::Strings(v, SetKind::Numbers),
            AttributeValue::Bs(v) => Self::Binaries(v),
            AttributeValue::Bool(b) => Self::Bool(*b),
            AttributeValue::Null(_) => Self::Null,
            AttributeValue::L(v) => Self::List(v),
            AttributeValue::M(m) => Self::Map(m),
        }
    }
}

impl Node<'_> {
    fn descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null => "NULL",
            Self::Strings(_, SetKind::Strings) => "SS",
            Self::Strings(_, SetKind::Numbers) => "NS",
            Self::Binaries(_) => "BS",
            Self::List(_) => "L",
            Self::Map(_) => "M",
        }
    }

    fn mismatch(&self, expected: &str) -> DecodeError {
        DecodeError::type_mismatch(expected, self.descriptor())
    }
}

/// Deserializer over a single borrowed attribute value.
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'de> {
    node: Node<'de>,
}

impl<'de> Deserializer<'de> {
    /// Read from `value`.
    #[must_use]
    pub fn new(value: &'de AttributeValue) -> Self {
        Self { node: value.into() }
    }

    /// Read from a top-level item.
    #[must_use]
    pub fn from_map(map: &'de HashMap<String, AttributeValue>) -> Self {
        Self {
            node: Node::Map(map),
        }
    }

    fn number(&self) -> Result<&'de str, DecodeError> {
        match self.node {
            Node::N(n) => Ok(n),
            other => Err(other.mismatch("N")),
        }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let raw = self.number()?;
                let parsed = raw
                    .trim()
                    .parse::<$ty>()
                    .map_err(|_| DecodeError::invalid_number(raw, stringify!($ty)))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::S(s) => visitor.visit_borrowed_str(s),
            Node::N(n) => {
                if let Ok(i) = n.parse::<i64>() {
                    visitor.visit_i64(i)
                } else if let Ok(u) = n.parse::<u64>() {
                    visitor.visit_u64(u)
                } else if let Ok(f) = n.parse::<f64>() {
                    visitor.visit_f64(f)
                } else {
                    Err(DecodeError::invalid_number(n, "number"))
                }
            }
            Node::B(b) => visitor.visit_borrowed_bytes(b),
            Node::Bool(b) => visitor.visit_bool(b),
            Node::Null => visitor.visit_unit(),
            Node::Strings(..) | Node::Binaries(_) | Node::List(_) => {
                visitor.visit_seq(SeqDeserializer::new(self.node))
            }
            Node::Map(m) => visitor.visit_map(MapDeserializer::new(m)),
        }
    }

    deserialize_number!(
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    );

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Bool(b) => visitor.visit_bool(b),
            other => Err(other.mismatch("BOOL")),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            // Numbers read into strings keep their full precision.
            Node::S(s) | Node::N(s) => visitor.visit_borrowed_str(s),
            other => Err(other.mismatch("S")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::B(b) => visitor.visit_borrowed_bytes(b),
            Node::Strings(..) | Node::Binaries(_) | Node::List(_) => {
                visitor.visit_seq(SeqDeserializer::new(self.node))
            }
            other => Err(other.mismatch("B")),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Null => visitor.visit_unit(),
            other => Err(other.mismatch("NULL")),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Strings(..) | Node::Binaries(_) | Node::List(_) => {
                visitor.visit_seq(SeqDeserializer::new(self.node))
            }
            other => Err(other.mismatch("L")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Map(m) => visitor.visit_map(MapDeserializer::new(m)),
            other => Err(other.mismatch("M")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::S(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Node::Map(m) if m.len() == 1 => {
                let Some((variant, value)) = m.iter().next() else {
                    return Err(self.node.mismatch("enum"));
                };
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value.into()),
                })
            }
            other => Err(other.mismatch("S or single-entry M")),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

/// Walks a list or set, tagging errors with the element index.
struct SeqDeserializer<'de> {
    node: Node<'de>,
    index: usize,
    len: usize,
}

impl<'de> SeqDeserializer<'de> {
    fn new(node: Node<'de>) -> Self {
        let len = match node {
            Node::Strings(v, _) => v.len(),
            Node::Binaries(v) => v.len(),
            Node::List(v) => v.len(),
            _ => 0,
        };
        Self {
            node,
            index: 0,
            len,
        }
    }

    fn get(&self, index: usize) -> Option<Node<'de>> {
        match self.node {
            Node::Strings(v, SetKind::Strings) => v.get(index).map(|s| Node::S(s)),
            Node::Strings(v, SetKind::Numbers) => v.get(index).map(|n| Node::N(n)),
            Node::Binaries(v) => v.get(index).map(|b| Node::B(b)),
            Node::List(v) => v.get(index).map(Node::from),
            _ => None,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        let Some(node) = self.get(self.index) else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        seed.deserialize(Deserializer { node })
            .map(Some)
            .map_err(|e| e.in_element(index))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

/// Walks a map, tagging errors with the entry key.
struct MapDeserializer<'de> {
    entries: hash_map::Iter<'de, String, AttributeValue>,
    pending: Option<(&'de str, &'de AttributeValue)>,
    remaining: usize,
}

impl<'de> MapDeserializer<'de> {
    fn new(map: &'de HashMap<String, AttributeValue>) -> Self {
        Self {
            entries: map.iter(),
            pending: None,
            remaining: map.len(),
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.remaining -= 1;
        self.pending = Some((key.as_str(), value));
        seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DecodeError> {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("map value requested before its key"));
        };
        seed.deserialize(Deserializer::new(value))
            .map_err(|e| e.in_field(key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Enum access for `S("Variant")` and `M({"Variant": value})` encodings.
struct EnumDeserializer<'de> {
    variant: &'de str,
    value: Option<Node<'de>>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = DecodeError;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantDeserializer<'de>), DecodeError> {
        let tag = seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(self.variant))?;
        Ok((
            tag,
            VariantDeserializer {
                variant: self.variant,
                value: self.value,
            },
        ))
    }
}

struct VariantDeserializer<'de> {
    variant: &'de str,
    value: Option<Node<'de>>,
}

impl<'de> VariantDeserializer<'de> {
    /// The variant's payload; a bare `S` variant has none.
    fn payload(&self, expected: &str) -> Result<Deserializer<'de>, DecodeError> {
        self.value
            .map(|node| Deserializer { node })
            .ok_or_else(|| DecodeError::type_mismatch(expected, "S").in_field(self.variant))
    }
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        match self.value {
            None | Some(Node::Null) => Ok(()),
            Some(other) => Err(other.mismatch("NULL").in_field(self.variant)),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DecodeError> {
        seed.deserialize(self.payload("a value")?)
            .map_err(|e| e.in_field(self.variant))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError> {
        self.payload("L")?
            .deserialize_seq(visitor)
            .map_err(|e| e.in_field(self.variant))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.payload("M")?
            .deserialize_map(visitor)
            .map_err(|e| e.in_field(self.variant))
    }
}
