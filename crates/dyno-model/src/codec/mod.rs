//! Typed codec between native Rust values and [`AttributeValue`].
//!
//! Encoding goes through `serde::Serialize`, so any `#[derive(Serialize)]`
//! record becomes an `M` value keyed by field name:
//!
//! | Rust shape | attribute value |
//! |---|---|
//! | `bool` | `BOOL` |
//! | integers, finite floats | `N` (shortest round-trip decimal) |
//! | `String`, `&str`, `char`, unit enum variant | `S` |
//! | `Bytes`, `serde_bytes` | `B` |
//! | `Option::None`, `()` | `NULL` |
//! | sequence of only strings / numbers / binaries | `SS` / `NS` / `BS` |
//! | any other sequence, tuples | `L` |
//! | maps with string, char or integer keys, structs | `M` |
//! | `chrono::DateTime<Utc>` | `S` (RFC 3339) |
//!
//! Decoding goes through `serde::Deserialize` and reports the path of the
//! first attribute that failed.

mod de;
mod error;
mod ser;

use serde::{Deserialize, Serialize};

pub use self::de::Deserializer;
pub use self::error::{DecodeError, EncodeError};
pub use self::ser::{MapSerializer, SeqSerializer, Serializer, VariantSerializer};
use crate::attribute_value::{AttributeValue, Item};

/// Maximum container nesting the encoder accepts before panicking.
pub const MAX_DEPTH: usize = 10;

/// Encode any serializable value.
///
/// # Panics
///
/// Panics when containers nest deeper than [`MAX_DEPTH`]. That only happens
/// for runaway, usually self-referential, structures and is treated as a
/// programming error.
pub fn to_attribute_value<T: ?Sized + Serialize>(value: &T) -> Result<AttributeValue, EncodeError> {
    value.serialize(Serializer::new())
}

/// Encode a value that must become a top-level item.
///
/// # Panics
///
/// Same depth guard as [`to_attribute_value`].
pub fn to_item<T: ?Sized + Serialize>(value: &T) -> Result<Item, EncodeError> {
    match to_attribute_value(value)? {
        AttributeValue::M(item) => Ok(item),
        other => Err(EncodeError::NotAnItem(other.type_descriptor())),
    }
}

/// Decode a single attribute value.
pub fn from_attribute_value<'de, T: Deserialize<'de>>(
    value: &'de AttributeValue,
) -> Result<T, DecodeError> {
    T::deserialize(Deserializer::new(value))
}

/// Decode an item.
pub fn from_item<'de, T: Deserialize<'de>>(item: &'de Item) -> Result<T, DecodeError> {
    T::deserialize(Deserializer::from_map(item))
}

/// Decode every item of a page. The first failure wins and carries the
/// item's index in its path.
pub fn from_items<'de, T: Deserialize<'de>>(items: &'de [Item]) -> Result<Vec<T>, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| from_item(item).map_err(|e| e.in_element(i)))
        .collect()
}

/// Custom item encoding that overrides the serde path for one type.
///
/// Any `Fn(&T) -> Item` closure is an encoder.
pub trait ItemEncoder<T: ?Sized>: Send + Sync {
    /// Build the item to store for `value`.
    fn encode(&self, value: &T) -> Item;
}

impl<T: ?Sized, F> ItemEncoder<T> for F
where
    F: Fn(&T) -> Item + Send + Sync,
{
    fn encode(&self, value: &T) -> Item {
        self(value)
    }
}
