//! Request bodies for each operation.
//!
//! These builders turn caller intent (a key, an item, a [`Condition`], a
//! projection) into the wire input types. Compiled expressions and their
//! alias tables are only attached when present.

use dyno_expression::{CompiledExpression, Condition, compile, compile_projection};
use dyno_model::input::{
    CreateTableInput, DeleteItemInput, GetItemInput, PutItemInput, ScanInput,
};
use dyno_model::types::{
    AttributeDefinition, BillingMode, Key, KeySchemaElement, ProvisionedThroughput,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue, ScalarAttributeType,
};
use dyno_model::{AttributeValue, EncodeError, Item, ItemEncoder, to_item};
use serde::Serialize;

fn single_key(field: impl Into<String>, value: impl Into<AttributeValue>) -> Key {
    Key::from([(field.into(), value.into())])
}

fn return_values(return_original: bool) -> ReturnValue {
    if return_original {
        ReturnValue::AllOld
    } else {
        ReturnValue::None
    }
}

/// Read one item by primary key.
#[derive(Debug, Clone)]
pub struct Get {
    table: String,
    key: Key,
    consistent_read: bool,
    projection: Vec<String>,
}

impl Get {
    /// Read the item whose `key_field` equals `key_value`. Reads are
    /// strongly consistent unless changed.
    pub fn new(
        table: impl Into<String>,
        key_field: impl Into<String>,
        key_value: impl Into<AttributeValue>,
    ) -> Self {
        Self::with_key(table, single_key(key_field, key_value))
    }

    /// Read the item with a composite key.
    pub fn with_key(table: impl Into<String>, key: Key) -> Self {
        Self {
            table: table.into(),
            key,
            consistent_read: true,
            projection: Vec::new(),
        }
    }

    /// Use strongly (`true`) or eventually (`false`) consistent reads.
    #[must_use]
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    /// Only return these attributes.
    #[must_use]
    pub fn projection<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = paths.into_iter().map(Into::into).collect();
        self
    }

    /// The wire input.
    #[must_use]
    pub fn to_input(&self) -> GetItemInput {
        let projection = compile_projection(self.projection.iter().cloned(), 0);
        GetItemInput {
            table_name: self.table.clone(),
            key: self.key.clone(),
            consistent_read: Some(self.consistent_read),
            projection_expression: projection.expression,
            expression_attribute_names: projection.names,
            return_consumed_capacity: Some(ReturnConsumedCapacity::Indexes),
        }
    }
}

/// Write one item, replacing any existing item with the same key.
#[derive(Debug, Clone)]
pub struct Put {
    table: String,
    item: Item,
    condition: Option<Condition>,
    return_original: bool,
}

impl Put {
    /// Store `value` using the default encoding.
    pub fn new<T: Serialize + ?Sized>(table: impl Into<String>, value: &T) -> Result<Self, EncodeError> {
        Ok(Self::from_item(table, to_item(value)?))
    }

    /// Store `value` using a custom encoder instead of the default encoding.
    pub fn with_encoder<T: ?Sized>(
        table: impl Into<String>,
        value: &T,
        encoder: &dyn ItemEncoder<T>,
    ) -> Self {
        Self::from_item(table, encoder.encode(value))
    }

    /// Store an already-encoded item.
    pub fn from_item(table: impl Into<String>, item: Item) -> Self {
        Self {
            table: table.into(),
            item,
            condition: None,
            return_original: false,
        }
    }

    /// Only write when `condition` holds for the existing item. To avoid
    /// overwriting, pass `Condition::attribute_not_exists(<key field>)`.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Return the replaced item, if any.
    #[must_use]
    pub fn return_original(mut self, return_original: bool) -> Self {
        self.return_original = return_original;
        self
    }

    /// The wire input.
    #[must_use]
    pub fn to_input(&self) -> PutItemInput {
        let compiled = compile(self.condition.as_ref(), 0);
        PutItemInput {
            table_name: self.table.clone(),
            item: self.item.clone(),
            condition_expression: compiled.expression,
            expression_attribute_names: compiled.names,
            expression_attribute_values: compiled.values,
            return_values: Some(return_values(self.return_original)),
            return_consumed_capacity: Some(ReturnConsumedCapacity::Indexes),
            return_item_collection_metrics: Some(ReturnItemCollectionMetrics::None),
        }
    }
}

/// Delete one item by primary key.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    key: Key,
    condition: Option<Condition>,
    return_original: bool,
}

impl Delete {
    /// Delete the item whose `key_field` equals `key_value`.
    pub fn new(
        table: impl Into<String>,
        key_field: impl Into<String>,
        key_value: impl Into<AttributeValue>,
    ) -> Self {
        Self::with_key(table, single_key(key_field, key_value))
    }

    /// Delete the item with a composite key.
    pub fn with_key(table: impl Into<String>, key: Key) -> Self {
        Self {
            table: table.into(),
            key,
            condition: None,
            return_original: false,
        }
    }

    /// Only delete when `condition` holds for the existing item.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Return the deleted item, if any.
    #[must_use]
    pub fn return_original(mut self, return_original: bool) -> Self {
        self.return_original = return_original;
        self
    }

    /// The wire input.
    #[must_use]
    pub fn to_input(&self) -> DeleteItemInput {
        let compiled = compile(self.condition.as_ref(), 0);
        DeleteItemInput {
            table_name: self.table.clone(),
            key: self.key.clone(),
            condition_expression: compiled.expression,
            expression_attribute_names: compiled.names,
            expression_attribute_values: compiled.values,
            return_values: Some(return_values(self.return_original)),
            return_consumed_capacity: Some(ReturnConsumedCapacity::Indexes),
        }
    }
}

/// Read every item in a table or index, optionally filtered.
///
/// The filter runs on the service after items are read, so filtered-out
/// items still consume read capacity.
#[derive(Debug, Clone)]
pub struct Scan {
    table: String,
    filter: Option<Condition>,
    projection: Vec<String>,
    index_name: Option<String>,
    consistent_read: bool,
}

impl Scan {
    /// Scan `table` with strongly consistent reads and no filter.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            projection: Vec::new(),
            index_name: None,
            consistent_read: true,
        }
    }

    /// Only return items matching `filter`.
    #[must_use]
    pub fn filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Only return these attributes.
    #[must_use]
    pub fn projection<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Scan a secondary index instead of the table.
    #[must_use]
    pub fn index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Use strongly (`true`) or eventually (`false`) consistent reads.
    #[must_use]
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    /// The table being scanned.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The filter, if any.
    #[must_use]
    pub fn filter_condition(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    /// The wire input for one page. The filter is aliased first and the
    /// projection continues from the filter's counter.
    #[must_use]
    pub fn to_input(&self, page_size: u32, exclusive_start_key: Option<&Key>) -> ScanInput {
        let mut compiled: CompiledExpression = compile(self.filter.as_ref(), 0);
        let projection = compile_projection(self.projection.iter().cloned(), compiled.next_counter);
        compiled.merge_names(projection.names);

        ScanInput {
            table_name: self.table.clone(),
            index_name: self.index_name.clone(),
            filter_expression: compiled.expression,
            projection_expression: projection.expression,
            expression_attribute_names: compiled.names,
            expression_attribute_values: compiled.values,
            limit: Some(page_size),
            exclusive_start_key: exclusive_start_key.cloned().unwrap_or_default(),
            consistent_read: Some(self.consistent_read),
            return_consumed_capacity: Some(ReturnConsumedCapacity::Indexes),
        }
    }
}

/// Billing for a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Billing {
    /// Fixed read and write capacity units.
    Provisioned {
        /// Read capacity units.
        read: i64,
        /// Write capacity units.
        write: i64,
    },
    /// On-demand.
    PayPerRequest,
}

impl Default for Billing {
    fn default() -> Self {
        Self::Provisioned { read: 5, write: 5 }
    }
}

/// A table to create.
#[derive(Debug, Clone)]
pub struct TableSpec {
    name: String,
    partition_key: (String, ScalarAttributeType),
    sort_key: Option<(String, ScalarAttributeType)>,
    billing: Billing,
}

impl TableSpec {
    /// A table keyed by `partition_key` of type `key_type`, provisioned at
    /// 5 read and 5 write units.
    pub fn new(
        name: impl Into<String>,
        partition_key: impl Into<String>,
        key_type: ScalarAttributeType,
    ) -> Self {
        Self {
            name: name.into(),
            partition_key: (partition_key.into(), key_type),
            sort_key: None,
            billing: Billing::default(),
        }
    }

    /// Add a sort key.
    #[must_use]
    pub fn sort_key(mut self, name: impl Into<String>, key_type: ScalarAttributeType) -> Self {
        self.sort_key = Some((name.into(), key_type));
        self
    }

    /// Set the billing mode.
    #[must_use]
    pub fn billing(mut self, billing: Billing) -> Self {
        self.billing = billing;
        self
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire input.
    #[must_use]
    pub fn to_input(&self) -> CreateTableInput {
        let (partition_name, partition_type) = &self.partition_key;
        let mut key_schema = vec![KeySchemaElement::hash(partition_name.as_str())];
        let mut attribute_definitions =
            vec![AttributeDefinition::new(partition_name.as_str(), *partition_type)];
        if let Some((sort_name, sort_type)) = &self.sort_key {
            key_schema.push(KeySchemaElement::range(sort_name.as_str()));
            attribute_definitions.push(AttributeDefinition::new(sort_name.as_str(), *sort_type));
        }

        let (billing_mode, provisioned_throughput) = match self.billing {
            Billing::Provisioned { read, write } => (
                BillingMode::Provisioned,
                Some(ProvisionedThroughput {
                    read_capacity_units: read,
                    write_capacity_units: write,
                }),
            ),
            Billing::PayPerRequest => (BillingMode::PayPerRequest, None),
        };

        CreateTableInput {
            table_name: self.name.clone(),
            key_schema,
            attribute_definitions,
            billing_mode: Some(billing_mode),
            provisioned_throughput,
        }
    }
}
