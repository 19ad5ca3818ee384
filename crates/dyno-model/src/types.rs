//! Wire types shared by several request and response envelopes.
//!
//! Struct fields are `PascalCase` on the wire. Enums are closed sets of
//! upper-case strings, generated by `wire_enum!`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// A fieldless enum whose variants serialize as fixed strings, with
/// `as_str` and `Display` returning the same string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// The string sent on the wire.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Role of an attribute in a key schema.
    pub enum KeyType {
        /// Partition key.
        Hash => "HASH",
        /// Sort key.
        Range => "RANGE",
    }
}

wire_enum! {
    /// Types a key attribute may have.
    pub enum ScalarAttributeType {
        /// String.
        S => "S",
        /// Number.
        N => "N",
        /// Binary.
        B => "B",
    }
}

wire_enum! {
    /// Type codes accepted by the `attribute_type` condition function.
    pub enum AttributeType {
        /// String.
        S => "S",
        /// String set.
        Ss => "SS",
        /// Number.
        N => "N",
        /// Number set.
        Ns => "NS",
        /// Binary.
        B => "B",
        /// Binary set.
        Bs => "BS",
        /// Boolean.
        Bool => "BOOL",
        /// Null.
        Null => "NULL",
        /// List.
        L => "L",
        /// Map.
        M => "M",
    }
}

impl From<AttributeType> for AttributeValue {
    fn from(value: AttributeType) -> Self {
        Self::S(value.as_str().to_owned())
    }
}

wire_enum! {
    /// How a table is billed.
    pub enum BillingMode {
        /// Fixed read and write units.
        Provisioned => "PROVISIONED",
        /// On-demand.
        PayPerRequest => "PAY_PER_REQUEST",
    }
}

wire_enum! {
    /// What a put or delete sends back about the item it replaced.
    pub enum ReturnValue {
        /// Nothing.
        None => "NONE",
        /// The whole item as it was before the write.
        AllOld => "ALL_OLD",
    }
}

wire_enum! {
    /// How much consumed-capacity detail a response carries.
    pub enum ReturnConsumedCapacity {
        /// The table and each index separately, plus the total.
        Indexes => "INDEXES",
        /// The total only.
        Total => "TOTAL",
        /// No report.
        None => "NONE",
    }
}

wire_enum! {
    /// Whether writes report item-collection sizes.
    pub enum ReturnItemCollectionMetrics {
        /// Report size estimates.
        Size => "SIZE",
        /// No report.
        None => "NONE",
    }
}

/// Lifecycle state of a table.
///
/// A freshly created table is `Creating` until it turns `Active`; a deleted
/// table is `Deleting` until describing it fails with
/// `ResourceNotFoundException`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Being created.
    Creating,
    /// Ready for reads and writes.
    Active,
    /// Being deleted.
    Deleting,
    /// Being modified; still readable and writable.
    Updating,
    /// Any state this client does not act on.
    #[serde(other)]
    Other,
}

impl TableStatus {
    /// The string sent on the wire, or `OTHER` for states not modelled.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Deleting => "DELETING",
            Self::Updating => "UPDATING",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key attribute and its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// Attribute name.
    pub attribute_name: String,
    /// Partition or sort.
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// The partition key.
    pub fn hash(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Hash,
        }
    }

    /// The sort key.
    pub fn range(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Range,
        }
    }
}

/// The declared type of a key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// Attribute name.
    pub attribute_name: String,
    /// `S`, `N` or `B`.
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Declare `name` as having scalar type `attribute_type`.
    pub fn new(name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: name.into(),
            attribute_type,
        }
    }
}

/// Read and write units requested for a provisioned table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Read capacity units.
    pub read_capacity_units: i64,
    /// Write capacity units.
    pub write_capacity_units: i64,
}

/// Billing mode as reported for an existing table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingModeSummary {
    /// Mode in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
}

/// Table metadata from `CreateTable`, `DescribeTable` and `DeleteTable`.
///
/// Only what the client reports or waits on is modelled; other fields in the
/// response are ignored when decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    /// Table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_status: Option<TableStatus>,
    /// Table ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    /// Partition key, then sort key if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Types of the key attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Creation time in epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    /// Approximate item count, refreshed by the service every few hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// Approximate size in bytes, refreshed like `item_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    /// Present for on-demand tables and tables that were once on-demand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode_summary: Option<BillingModeSummary>,
    /// Provisioned units; zero for on-demand tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

/// Units consumed against one table or index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    /// Read units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Read plus write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// The `ConsumedCapacity` block of a response.
///
/// With `ReturnConsumedCapacity: INDEXES` the table and each touched index
/// are broken out; the top-level numbers are the totals. See
/// [`CapacitySummary`](crate::CapacitySummary) for folding many of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// Table the request ran against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Total units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    /// Total read units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Total write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Units against the base table alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    /// Units per local secondary index.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub local_secondary_indexes: HashMap<String, Capacity>,
    /// Units per global secondary index.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub global_secondary_indexes: HashMap<String, Capacity>,
}

/// A primary key: key attribute names to values.
pub type Key = HashMap<String, AttributeValue>;

/// `#n<i>` alias to attribute name.
pub type ExpressionAttributeNames = HashMap<String, String>;

/// `:v<i>` alias to literal value.
pub type ExpressionAttributeValues = HashMap<String, AttributeValue>;
