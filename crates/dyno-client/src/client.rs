//! The typed client.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use dyno_auth::CredentialSource;
use dyno_model::input::{DeleteTableInput, DescribeTableInput};
use dyno_model::output::{
    CreateTableOutput, DeleteItemOutput, DeleteTableOutput, DescribeTableOutput, GetItemOutput,
    PutItemOutput, ScanOutput,
};
use dyno_model::types::{Key, TableDescription, TableStatus};
use dyno_model::{CapacitySummary, DynoOperation, Item, ServiceErrorCode, from_item};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::DynoOptions;
use crate::connection::Connection;
use crate::envelope::{Delete, Get, Put, Scan, TableSpec};
use crate::error::{DynoError, Result};
use crate::region::resolve_region;
use crate::request::Endpoint;
use crate::result::DynoResult;
use crate::transport::{ReqwestTransport, Transport};

/// One page of a scan.
#[derive(Debug, Clone)]
pub struct ScanPage<T> {
    /// Items on this page that passed the filter, and the page's capacity.
    pub result: DynoResult<T>,
    /// Items read before filtering.
    pub scanned_count: i64,
    /// Where to resume, or `None` on the last page.
    pub last_evaluated_key: Option<Key>,
}

/// Client for one region.
///
/// Cloning is cheap; clones share the transport and credentials.
#[derive(Debug, Clone)]
pub struct Dyno {
    connection: Connection,
    page_size: u32,
}

impl Dyno {
    /// Connect over HTTPS.
    ///
    /// The region resolves as described in [`resolve_region`] and the
    /// credentials as described in [`CredentialSource::resolve`].
    pub fn new(
        region: Option<&str>,
        credentials: &CredentialSource,
        options: DynoOptions,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(options.timeout)?;
        Self::with_transport(Arc::new(transport), region, credentials, options)
    }

    /// Connect through a caller-supplied transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        region: Option<&str>,
        credentials: &CredentialSource,
        options: DynoOptions,
    ) -> Result<Self> {
        let credentials = credentials.resolve()?;
        let region = resolve_region(region);
        let endpoint = Endpoint::resolve(&region, options.endpoint.as_deref())?;
        info!(region = %region, endpoint = endpoint.uri(), "client configured");

        let connection = Connection::new(transport, credentials, region, endpoint, options.log);
        Ok(Self::from_connection(connection, &options))
    }

    /// Wrap an existing connection.
    #[must_use]
    pub fn from_connection(connection: Connection, options: &DynoOptions) -> Self {
        Self {
            connection,
            page_size: options.effective_page_size(),
        }
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Read one item. The result is empty when no item has the key.
    pub async fn get<T: DeserializeOwned>(&self, get: &Get) -> Result<DynoResult<T>> {
        let output: GetItemOutput = self
            .connection
            .call(DynoOperation::GetItem, &get.to_input())
            .await?;
        let items = match &output.item {
            Some(item) => vec![from_item(item)?],
            None => Vec::new(),
        };
        Ok(DynoResult::new(items, output.consumed_capacity.into()))
    }

    /// Write one item. The result holds the replaced item when
    /// [`Put::return_original`] was set and one existed.
    pub async fn put<T: DeserializeOwned>(&self, put: &Put) -> Result<DynoResult<T>> {
        let output: PutItemOutput = self
            .connection
            .call(DynoOperation::PutItem, &put.to_input())
            .await?;
        Ok(DynoResult::new(
            decode_attributes(&output.attributes)?,
            output.consumed_capacity.into(),
        ))
    }

    /// Delete one item. The result holds the deleted item when
    /// [`Delete::return_original`] was set and one existed.
    pub async fn delete<T: DeserializeOwned>(&self, delete: &Delete) -> Result<DynoResult<T>> {
        let output: DeleteItemOutput = self
            .connection
            .call(DynoOperation::DeleteItem, &delete.to_input())
            .await?;
        Ok(DynoResult::new(
            decode_attributes(&output.attributes)?,
            output.consumed_capacity.into(),
        ))
    }

    /// Fetch a single page, starting after `start_key`.
    pub async fn scan_page<T: DeserializeOwned>(
        &self,
        scan: &Scan,
        start_key: Option<&Key>,
    ) -> Result<ScanPage<T>> {
        let output = self.scan_raw_page(scan, start_key).await?;
        let items = output
            .items
            .iter()
            .map(|item| from_item(item).map_err(DynoError::from))
            .collect::<Result<Vec<T>>>()?;
        Ok(ScanPage {
            result: DynoResult::new(items, output.consumed_capacity.into()),
            scanned_count: output.scanned_count,
            last_evaluated_key: output.last_evaluated_key.filter(|key| !key.is_empty()),
        })
    }

    /// Read every page and decode every item as `T`.
    ///
    /// Pages are requested one after another, each continuing from the
    /// previous page's `LastEvaluatedKey`. The first failing page aborts the
    /// scan; nothing read so far is returned.
    pub async fn scan<T: DeserializeOwned>(&self, scan: &Scan) -> Result<DynoResult<T>> {
        let mut result = DynoResult::default();
        let mut start_key: Option<Key> = None;
        let mut pages = 0_usize;

        loop {
            let page = self.scan_page::<T>(scan, start_key.as_ref()).await?;
            pages += 1;
            debug!(
                table = scan.table(),
                page = pages,
                items = page.result.len(),
                scanned = page.scanned_count,
                more = page.last_evaluated_key.is_some(),
                "scan page"
            );
            result.aggregate(page.result);
            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        info!(table = scan.table(), pages, items = result.len(), "scan complete");
        Ok(result)
    }

    /// [`Dyno::scan`] followed by a stable client-side sort.
    pub async fn scan_sorted_by<T, F>(&self, scan: &Scan, compare: F) -> Result<DynoResult<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut result = self.scan::<T>(scan).await?;
        result.sort_by(compare);
        Ok(result)
    }

    /// Read every page without decoding, keeping each item's type
    /// descriptors.
    pub async fn scan_items(&self, scan: &Scan) -> Result<DynoResult<Item>> {
        let mut result = DynoResult::default();
        let mut start_key: Option<Key> = None;

        loop {
            let output = self.scan_raw_page(scan, start_key.as_ref()).await?;
            let more = output.has_more();
            result.aggregate(DynoResult::new(output.items, output.consumed_capacity.into()));
            if !more {
                break;
            }
            start_key = output.last_evaluated_key;
        }

        Ok(result)
    }

    async fn scan_raw_page(&self, scan: &Scan, start_key: Option<&Key>) -> Result<ScanOutput> {
        if let Some(filter) = scan.filter_condition() {
            debug!(table = scan.table(), filter = %filter, "scan filter");
        }
        self.connection
            .call(DynoOperation::Scan, &scan.to_input(self.page_size, start_key))
            .await
    }

    /// Create a table. It starts out `CREATING`; see
    /// [`Dyno::create_table_and_wait`].
    pub async fn create_table(&self, spec: &TableSpec) -> Result<TableDescription> {
        let output: CreateTableOutput = self
            .connection
            .call(DynoOperation::CreateTable, &spec.to_input())
            .await?;
        info!(table = spec.name(), "table created");
        Ok(output.table_description.unwrap_or_default())
    }

    /// Create a table and poll until it is `ACTIVE`. Returns `false` if it
    /// was still not active after `attempts` polls.
    pub async fn create_table_and_wait(
        &self,
        spec: &TableSpec,
        interval: Duration,
        attempts: u32,
    ) -> Result<bool> {
        self.create_table(spec).await?;
        self.wait_for_status(spec.name(), &TableStatus::Active, interval, attempts)
            .await
    }

    /// Describe a table.
    pub async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let output: DescribeTableOutput = self
            .connection
            .call(
                DynoOperation::DescribeTable,
                &DescribeTableInput {
                    table_name: table.to_owned(),
                },
            )
            .await?;
        Ok(output.table.unwrap_or_default())
    }

    /// Delete a table. It is `DELETING` until it disappears; see
    /// [`Dyno::delete_table_and_wait`].
    pub async fn delete_table(&self, table: &str) -> Result<TableDescription> {
        let output: DeleteTableOutput = self
            .connection
            .call(
                DynoOperation::DeleteTable,
                &DeleteTableInput {
                    table_name: table.to_owned(),
                },
            )
            .await?;
        info!(table, "table deletion requested");
        Ok(output.table_description.unwrap_or_default())
    }

    /// Delete a table and poll until it no longer exists.
    pub async fn delete_table_and_wait(
        &self,
        table: &str,
        interval: Duration,
        attempts: u32,
    ) -> Result<bool> {
        self.delete_table(table).await?;
        self.wait_for_deletion(table, interval, attempts).await
    }

    /// Poll `describe_table` every `interval` until the table reports
    /// `status`. Returns `false` if it did not within `attempts` polls.
    pub async fn wait_for_status(
        &self,
        table: &str,
        status: &TableStatus,
        interval: Duration,
        attempts: u32,
    ) -> Result<bool> {
        for attempt in 1..=attempts {
            let description = self.describe_table(table).await?;
            if description.table_status.as_ref() == Some(status) {
                info!(table, status = %status, attempt, "table reached status");
                return Ok(true);
            }
            debug!(
                table,
                current = ?description.table_status,
                wanted = %status,
                attempt,
                "waiting for table status"
            );
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(false)
    }

    /// Poll `describe_table` every `interval` until the service reports the
    /// table as not found. Returns `false` if it still existed after
    /// `attempts` polls.
    pub async fn wait_for_deletion(
        &self,
        table: &str,
        interval: Duration,
        attempts: u32,
    ) -> Result<bool> {
        for attempt in 1..=attempts {
            match self.describe_table(table).await {
                Err(err)
                    if err.service_code() == Some(&ServiceErrorCode::ResourceNotFoundException) =>
                {
                    info!(table, attempt, "table deleted");
                    return Ok(true);
                }
                Err(err) => return Err(err),
                Ok(_) => debug!(table, attempt, "waiting for table deletion"),
            }
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(false)
    }
}

fn decode_attributes<T: DeserializeOwned>(attributes: &Item) -> Result<Vec<T>> {
    if attributes.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![from_item(attributes)?])
    }
}

/// Capacity consumed by a batch of results.
pub fn total_capacity<'a, T: 'a>(
    results: impl IntoIterator<Item = &'a DynoResult<T>>,
) -> CapacitySummary {
    results
        .into_iter()
        .map(|r| r.consumed_capacity.clone())
        .sum()
}

#[cfg(test)]
mod tests {
    use dyno_expression::{Comparator, Condition};
    use dyno_model::types::ScalarAttributeType;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::transport::mock::MockTransport;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Dinosaur {
        id: String,
        name: String,
        teeth: u32,
    }

    fn client(mock: &MockTransport, page_size: Option<u32>) -> Dyno {
        Dyno::with_transport(
            Arc::new(mock.clone()),
            Some("us-east-2"),
            &CredentialSource::from_bytes(
                "aws_access_key_id=AKIDEXAMPLE\naws_secret_access_key=secret\n",
            ),
            DynoOptions {
                page_size,
                ..DynoOptions::default()
            },
        )
        .unwrap()
    }

    fn page_body(items: &[(&str, &str, u32)], last_key: Option<&str>, units: f64) -> String {
        let items: Vec<_> = items
            .iter()
            .map(|(id, name, teeth)| {
                json!({"id": {"S": id}, "name": {"S": name}, "teeth": {"N": teeth.to_string()}})
            })
            .collect();
        let mut body = json!({
            "Items": items,
            "Count": items.len(),
            "ScannedCount": items.len(),
            "ConsumedCapacity": {"TableName": "Dinosaurs", "CapacityUnits": units}
        });
        if let Some(id) = last_key {
            body["LastEvaluatedKey"] = json!({"id": {"S": id}});
        }
        body.to_string()
    }

    #[tokio::test]
    async fn test_should_fold_every_scan_page() {
        let mock = MockTransport::new();
        mock.reply(200, page_body(&[("1", "Joe", 40), ("2", "Ann", 60)], Some("2"), 0.5))
            .reply(200, page_body(&[], Some("3"), 0.5))
            .reply(200, page_body(&[("4", "Rex", 300)], None, 1.0));

        let scan = Scan::new("Dinosaurs").filter(Condition::compare("teeth", Comparator::Ge, 40));
        let result = client(&mock, Some(2)).scan::<Dinosaur>(&scan).await.unwrap();

        let names: Vec<_> = result.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Joe", "Ann", "Rex"]);
        assert_eq!(result.consumed_capacity.total.capacity_units, Some(2.0));

        let bodies = mock.bodies();
        assert_eq!(bodies.len(), 3);
        assert!(bodies[0].get("ExclusiveStartKey").is_none());
        assert_eq!(bodies[1]["ExclusiveStartKey"], json!({"id": {"S": "2"}}));
        assert_eq!(bodies[2]["ExclusiveStartKey"], json!({"id": {"S": "3"}}));
        for body in &bodies {
            assert_eq!(body["Limit"], 2);
            assert_eq!(body["FilterExpression"], "#n0 >= :v0");
        }
    }

    #[tokio::test]
    async fn test_should_abort_scan_on_first_failed_page() {
        let mock = MockTransport::new();
        mock.reply(200, page_body(&[("1", "Joe", 40)], Some("1"), 0.5))
            .reply(
                400,
                r#"{"__type": "com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException", "message": "slow down"}"#,
            )
            .reply(200, page_body(&[("2", "Ann", 60)], None, 0.5));

        let err = client(&mock, None)
            .scan::<Dinosaur>(&Scan::new("Dinosaurs"))
            .await
            .unwrap_err();
        assert_eq!(
            err.service_code(),
            Some(&ServiceErrorCode::ProvisionedThroughputExceededException)
        );
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_should_fail_page_on_malformed_item() {
        let mock = MockTransport::new();
        mock.reply(
            200,
            json!({"Items": [{"id": {"S": "1"}, "name": {"S": "Joe"}, "teeth": {"S": "many"}}]})
                .to_string(),
        );

        let err = client(&mock, None)
            .scan::<Dinosaur>(&Scan::new("Dinosaurs"))
            .await
            .unwrap_err();
        assert!(matches!(err, DynoError::Decode(_)));
    }

    #[tokio::test]
    async fn test_should_sort_scan_results() {
        let mock = MockTransport::new();
        mock.reply(200, page_body(&[("1", "Joe", 40), ("2", "Ann", 60), ("3", "Rex", 50)], None, 1.0));

        let result = client(&mock, None)
            .scan_sorted_by::<Dinosaur, _>(&Scan::new("Dinosaurs"), |a, b| a.teeth.cmp(&b.teeth))
            .await
            .unwrap();
        let teeth: Vec<_> = result.items.iter().map(|d| d.teeth).collect();
        assert_eq!(teeth, [40, 50, 60]);
        assert_eq!(mock.bodies()[0]["Limit"], 100);
    }

    #[tokio::test]
    async fn test_should_scan_raw_items() {
        let mock = MockTransport::new();
        mock.reply(200, page_body(&[("1", "Joe", 40)], Some("1"), 0.5))
            .reply(200, page_body(&[("2", "Ann", 60)], None, 0.5));

        let result = client(&mock, None)
            .scan_items(&Scan::new("Dinosaurs"))
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.items[1]["name"].as_s(), Some("Ann"));
    }

    #[tokio::test]
    async fn test_should_get_missing_item_as_empty_result() {
        let mock = MockTransport::new();
        mock.reply(200, r#"{"ConsumedCapacity": {"TableName": "Dinosaurs", "CapacityUnits": 1.0}}"#)
            .reply(
                200,
                r#"{"Item": {"id": {"S": "1"}, "name": {"S": "Joe"}, "teeth": {"N": "40"}}}"#,
            );
        let dyno = client(&mock, None);

        let missing = dyno
            .get::<Dinosaur>(&Get::new("Dinosaurs", "id", "9"))
            .await
            .unwrap();
        assert!(missing.is_empty());
        assert_eq!(missing.consumed_capacity.total.capacity_units, Some(1.0));

        let found = dyno
            .get::<Dinosaur>(&Get::new("Dinosaurs", "id", "1"))
            .await
            .unwrap();
        assert_eq!(found.into_first().map(|d| d.name), Some("Joe".to_owned()));
        assert_eq!(mock.bodies()[1]["Key"], json!({"id": {"S": "1"}}));
    }

    #[tokio::test]
    async fn test_should_put_and_return_original() {
        let mock = MockTransport::new();
        mock.reply(
            200,
            r#"{"Attributes": {"id": {"S": "1"}, "name": {"S": "Old Joe"}, "teeth": {"N": "39"}}}"#,
        );
        let joe = Dinosaur {
            id: "1".to_owned(),
            name: "Joe".to_owned(),
            teeth: 40,
        };

        let put = Put::new("Dinosaurs", &joe).unwrap().return_original(true);
        let original = client(&mock, None).put::<Dinosaur>(&put).await.unwrap();
        assert_eq!(original.first().map(|d| d.teeth), Some(39));
        assert_eq!(mock.bodies()[0]["Item"]["name"], json!({"S": "Joe"}));
        assert_eq!(mock.bodies()[0]["ReturnValues"], "ALL_OLD");
    }

    #[tokio::test]
    async fn test_should_surface_failed_delete_condition() {
        let mock = MockTransport::new();
        mock.reply(
            400,
            r#"{"__type": "com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException", "message": "The conditional request failed"}"#,
        );

        let delete = Delete::new("Dinosaurs", "id", "1").condition(Condition::attribute_exists("id"));
        let err = client(&mock, None)
            .delete::<Dinosaur>(&delete)
            .await
            .unwrap_err();
        assert_eq!(
            err.service_code(),
            Some(&ServiceErrorCode::ConditionalCheckFailedException)
        );
    }

    #[tokio::test]
    async fn test_should_wait_until_table_is_active() {
        let mock = MockTransport::new();
        mock.reply(
            200,
            r#"{"TableDescription": {"TableName": "Dinosaurs", "TableStatus": "CREATING"}}"#,
        )
        .reply(200, r#"{"Table": {"TableName": "Dinosaurs", "TableStatus": "CREATING"}}"#)
        .reply(200, r#"{"Table": {"TableName": "Dinosaurs", "TableStatus": "ACTIVE"}}"#);

        let spec = TableSpec::new("Dinosaurs", "id", ScalarAttributeType::S);
        let active = client(&mock, None)
            .create_table_and_wait(&spec, Duration::ZERO, 5)
            .await
            .unwrap();
        assert!(active);

        let targets: Vec<_> = mock
            .requests()
            .iter()
            .map(|r| r.headers["x-amz-target"].to_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            targets,
            [
                "DynamoDB_20120810.CreateTable",
                "DynamoDB_20120810.DescribeTable",
                "DynamoDB_20120810.DescribeTable"
            ]
        );
    }

    #[tokio::test]
    async fn test_should_give_up_waiting_after_attempts() {
        let mock = MockTransport::new();
        for _ in 0..2 {
            mock.reply(200, r#"{"Table": {"TableName": "T", "TableStatus": "UPDATING"}}"#);
        }

        let active = client(&mock, None)
            .wait_for_status("T", &TableStatus::Active, Duration::ZERO, 2)
            .await
            .unwrap();
        assert!(!active);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_should_wait_until_table_is_gone() {
        let mock = MockTransport::new();
        mock.reply(200, r#"{"TableDescription": {"TableName": "T", "TableStatus": "DELETING"}}"#)
            .reply(200, r#"{"Table": {"TableName": "T", "TableStatus": "DELETING"}}"#)
            .reply(
                400,
                r#"{"__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException", "message": "Requested resource not found: Table: T not found"}"#,
            );

        let deleted = client(&mock, None)
            .delete_table_and_wait("T", Duration::ZERO, 5)
            .await
            .unwrap();
        assert!(deleted);
    }

    #[test]
    fn test_should_sum_capacity_across_results() {
        let capacity = |units| {
            CapacitySummary::from(dyno_model::types::ConsumedCapacity {
                capacity_units: Some(units),
                ..Default::default()
            })
        };
        let results = [
            DynoResult::<Dinosaur>::new(Vec::new(), capacity(1.0)),
            DynoResult::new(Vec::new(), capacity(2.5)),
        ];
        assert_eq!(total_capacity(&results).total.capacity_units, Some(3.5));
    }
}
