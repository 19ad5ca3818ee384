//! `serde::Serializer` producing [`AttributeValue`] trees.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use serde::ser::{self, Serialize};

use super::MAX_DEPTH;
use super::error::EncodeError;
use crate::attribute_value::AttributeValue;

/// Serializer that turns any `Serialize` value into an [`AttributeValue`].
///
/// Each container opened increments `depth`; opening one at [`MAX_DEPTH`]
/// panics, since only a runaway (usually self-referential) structure nests
/// that far.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    depth: usize,
}

impl Serializer {
    /// A serializer at the top of the tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(self) -> Self {
        assert!(
            self.depth < MAX_DEPTH,
            "attribute value nesting exceeds {MAX_DEPTH} levels; is the structure self-referential?"
        );
        Self {
            depth: self.depth + 1,
        }
    }
}

fn number<T: ToString>(value: T) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn float(value: f64, raw: impl ToString) -> Result<AttributeValue, EncodeError> {
    if value.is_finite() {
        Ok(number(raw))
    } else {
        Err(EncodeError::NonFiniteNumber(raw.to_string()))
    }
}

/// Collapse a homogeneous run of strings, numbers or binaries into a set.
///
/// Anything else stays a list: the empty sequence, mixed members, and runs
/// with a repeated member, which the service rejects as a set.
fn collapse(items: Vec<AttributeValue>) -> AttributeValue {
    if items.is_empty() || has_duplicates(&items) {
        return AttributeValue::L(items);
    }
    if items.iter().all(AttributeValue::is_s) {
        return AttributeValue::Ss(
            items
                .into_iter()
                .filter_map(|v| match v {
                    AttributeValue::S(s) => Some(s),
                    _ => None,
                })
                .collect(),
        );
    }
    if items.iter().all(AttributeValue::is_n) {
        return AttributeValue::Ns(
            items
                .into_iter()
                .filter_map(|v| match v {
                    AttributeValue::N(n) => Some(n),
                    _ => None,
                })
                .collect(),
        );
    }
    if items.iter().all(AttributeValue::is_b) {
        return AttributeValue::Bs(
            items
                .into_iter()
                .filter_map(|v| match v {
                    AttributeValue::B(b) => Some(b),
                    _ => None,
                })
                .collect(),
        );
    }
    AttributeValue::L(items)
}

fn has_duplicates(items: &[AttributeValue]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    !items.iter().all(|item| seen.insert(item))
}

impl ser::Serializer for Serializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSerializer<SeqSerializer>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantSerializer<MapSerializer>;

    fn serialize_bool(self, v: bool) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_i16(self, v: i16) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_i32(self, v: i32) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_i64(self, v: i64) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_i128(self, v: i128) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_u8(self, v: u8) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_u16(self, v: u16) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_u32(self, v: u32) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_u64(self, v: u64) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_u128(self, v: u128) -> Result<AttributeValue, EncodeError> {
        Ok(number(v))
    }

    fn serialize_f32(self, v: f32) -> Result<AttributeValue, EncodeError> {
        float(f64::from(v), v)
    }

    fn serialize_f64(self, v: f64) -> Result<AttributeValue, EncodeError> {
        float(v, v)
    }

    fn serialize_char(self, v: char) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::S(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::S(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::B(Bytes::copy_from_slice(v)))
    }

    fn serialize_none(self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<AttributeValue, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::S(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<AttributeValue, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<AttributeValue, EncodeError> {
        let inner = value.serialize(self.enter())?;
        Ok(AttributeValue::M(HashMap::from([(variant.to_owned(), inner)])))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, EncodeError> {
        Ok(SeqSerializer::new(self.enter(), len, true))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, EncodeError> {
        Ok(SeqSerializer::new(self.enter(), Some(len), false))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, EncodeError> {
        Ok(SeqSerializer::new(self.enter(), Some(len), false))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<SeqSerializer>, EncodeError> {
        let inner = self.enter();
        Ok(VariantSerializer {
            variant,
            inner: SeqSerializer::new(inner.enter(), Some(len), false),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer, EncodeError> {
        Ok(MapSerializer::new(self.enter(), len))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapSerializer, EncodeError> {
        Ok(MapSerializer::new(self.enter(), Some(len)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<MapSerializer>, EncodeError> {
        let inner = self.enter();
        Ok(VariantSerializer {
            variant,
            inner: MapSerializer::new(inner.enter(), Some(len)),
        })
    }
}

/// Collects sequence elements; plain sequences may collapse into sets.
#[derive(Debug)]
pub struct SeqSerializer {
    element: Serializer,
    items: Vec<AttributeValue>,
    allow_sets: bool,
}

impl SeqSerializer {
    fn new(element: Serializer, len: Option<usize>, allow_sets: bool) -> Self {
        Self {
            element,
            items: Vec::with_capacity(len.unwrap_or(0)),
            allow_sets,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(self.element)?);
        Ok(())
    }

    fn finish(self) -> AttributeValue {
        if self.allow_sets {
            collapse(self.items)
        } else {
            AttributeValue::L(self.items)
        }
    }
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push(value)
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(self.finish())
    }
}

/// Collects map entries and struct fields into an `M` value.
#[derive(Debug)]
pub struct MapSerializer {
    element: Serializer,
    entries: HashMap<String, AttributeValue>,
    pending_key: Option<String>,
}

impl MapSerializer {
    fn new(element: Serializer, len: Option<usize>) -> Self {
        Self {
            element,
            entries: HashMap::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        }
    }
}

impl ser::SerializeMap for MapSerializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".to_owned()))?;
        self.entries.insert(key, value.serialize(self.element)?);
        Ok(())
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::M(self.entries))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.entries
            .insert(key.to_owned(), value.serialize(self.element)?);
        Ok(())
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::M(self.entries))
    }
}

/// Wraps a tuple or struct variant as `{"Variant": ...}`.
#[derive(Debug)]
pub struct VariantSerializer<S> {
    variant: &'static str,
    inner: S,
}

impl VariantSerializer<SeqSerializer> {
    fn wrap(self) -> AttributeValue {
        AttributeValue::M(HashMap::from([(
            self.variant.to_owned(),
            AttributeValue::L(self.inner.items),
        )]))
    }
}

impl ser::SerializeTupleVariant for VariantSerializer<SeqSerializer> {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.inner.push(value)
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(self.wrap())
    }
}

impl ser::SerializeStructVariant for VariantSerializer<MapSerializer> {
    type Ok = AttributeValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::M(HashMap::from([(
            self.variant.to_owned(),
            AttributeValue::M(self.inner.entries),
        )])))
    }
}

/// Serializes map keys. Strings pass through; chars and integers are
/// stringified; everything else is rejected.
struct KeySerializer;

macro_rules! key_to_string {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<String, EncodeError> {
                Ok(v.to_string())
            }
        )*
    };
}

macro_rules! reject_key {
    ($($method:ident($($arg:ty),*) => $kind:literal),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<String, EncodeError> {
                Err(EncodeError::KeyMustBeAString($kind))
            }
        )*
    };
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = EncodeError;

    type SerializeSeq = ser::Impossible<String, EncodeError>;
    type SerializeTuple = ser::Impossible<String, EncodeError>;
    type SerializeTupleStruct = ser::Impossible<String, EncodeError>;
    type SerializeTupleVariant = ser::Impossible<String, EncodeError>;
    type SerializeMap = ser::Impossible<String, EncodeError>;
    type SerializeStruct = ser::Impossible<String, EncodeError>;
    type SerializeStructVariant = ser::Impossible<String, EncodeError>;

    key_to_string!(
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_char: char,
    );

    reject_key!(
        serialize_bool(bool) => "bool",
        serialize_f32(f32) => "float",
        serialize_f64(f64) => "float",
        serialize_bytes(&[u8]) => "bytes",
        serialize_none() => "none",
        serialize_unit() => "unit",
        serialize_unit_struct(&'static str) => "unit struct",
    );

    fn serialize_str(self, v: &str) -> Result<String, EncodeError> {
        Ok(v.to_owned())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, EncodeError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, EncodeError> {
        Err(EncodeError::KeyMustBeAString("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(EncodeError::KeyMustBeAString("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(EncodeError::KeyMustBeAString("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(EncodeError::KeyMustBeAString("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(EncodeError::KeyMustBeAString("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(EncodeError::KeyMustBeAString("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(EncodeError::KeyMustBeAString("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(EncodeError::KeyMustBeAString("enum"))
    }
}
