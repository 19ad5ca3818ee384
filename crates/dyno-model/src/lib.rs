//! Data model for Dyno.
//!
//! This crate holds the tagged-union [`AttributeValue`], the serde-driven
//! [`codec`] between native Rust values and attribute values, the JSON request
//! and response envelopes for each operation, and consumed-capacity folding.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]

pub mod attribute_value;
pub mod capacity;
pub mod codec;
mod convert;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::{AttributeValue, Item};
pub use capacity::CapacitySummary;
pub use codec::{
    DecodeError, EncodeError, ItemEncoder, from_attribute_value, from_item, from_items,
    to_attribute_value, to_item,
};
pub use error::{ServiceErrorBody, ServiceErrorCode};
pub use operations::DynoOperation;
