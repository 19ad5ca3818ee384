//! Response bodies.
//!
//! Anything the service may omit has a default, so `{}` decodes for every
//! output type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::Item;
use crate::types::{ConsumedCapacity, Key, TableDescription};

/// `CreateTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableOutput {
    /// Usually still `CREATING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// `DeleteTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableOutput {
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// `DescribeTable`. Note the field is `Table`, not `TableDescription`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDescription>,
}

/// `PutItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// Replaced item; empty unless `ALL_OLD` was requested and an item existed.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: Item,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// `GetItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// Absent when nothing is stored under the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// `DeleteItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemOutput {
    /// Deleted item; empty unless `ALL_OLD` was requested and an item existed.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: Item,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// One `Scan` page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    /// Items that passed the filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// `items.len()` as reported by the service.
    #[serde(default)]
    pub count: i64,
    /// Items read before filtering.
    #[serde(default)]
    pub scanned_count: i64,
    /// Continuation key, set only while pages remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Key>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

impl ScanOutput {
    /// `true` when a non-empty `LastEvaluatedKey` came back.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.last_evaluated_key
            .as_ref()
            .is_some_and(|key| !key.is_empty())
    }
}
