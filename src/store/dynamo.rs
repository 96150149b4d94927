//! Amazon DynamoDB backed store.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{self as sdk, KeyType, ScalarAttributeType};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::{
    AttributeValue, DeletedTable, Item, KeyElement, KeySchema, PrimaryKey, ScalarType,
    ServiceError, ServiceResult, TableDescription, TableStore,
};
use crate::credentials::Credentials;

/// Where to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Service region, e.g. `us-east-1`.
    pub region: String,
    /// Endpoint override, e.g. `http://localhost:8000` for local DynamoDB.
    pub endpoint_url: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
        }
    }
}

/// Store backed by the DynamoDB API.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Build a client from file credentials and service settings.
    pub async fn connect(credentials: &Credentials, settings: &ServiceSettings) -> Self {
        let provider = aws_sdk_dynamodb::config::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            credentials.session_token.clone(),
            None,
            "dynamo-shell-credentials-file",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(provider);
        if let Some(url) = &settings.endpoint_url {
            loader = loader.endpoint_url(url.clone());
        }

        let config = loader.load().await;
        debug!(region = %settings.region, endpoint = ?settings.endpoint_url, "table service client ready");
        Self::from_client(Client::new(&config))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn service_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let message = match err.as_service_error() {
        Some(service) => match (service.code(), service.message()) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.to_string(),
            _ => service.to_string(),
        },
        None => DisplayErrorContext(&err).to_string(),
    };
    ServiceError::new(operation, message)
}

fn scalar_type(value: &ScalarAttributeType) -> Option<ScalarType> {
    ScalarType::from_tag(value.as_str())
}

fn convert_description(
    operation: &'static str,
    table: &sdk::TableDescription,
) -> ServiceResult<TableDescription> {
    let name = table
        .table_name()
        .ok_or_else(|| ServiceError::new(operation, "response is missing the table name"))?;

    let element = |key_type: KeyType| -> ServiceResult<Option<KeyElement>> {
        let Some(key) = table.key_schema().iter().find(|k| *k.key_type() == key_type) else {
            return Ok(None);
        };
        let attr_type = table
            .attribute_definitions()
            .iter()
            .find(|d| d.attribute_name() == key.attribute_name())
            .and_then(|d| scalar_type(d.attribute_type()))
            .ok_or_else(|| {
                ServiceError::new(
                    operation,
                    format!("no scalar type for key attribute {}", key.attribute_name()),
                )
            })?;
        Ok(Some(KeyElement::new(key.attribute_name(), attr_type)))
    };

    let hash = element(KeyType::Hash)?
        .ok_or_else(|| ServiceError::new(operation, format!("table {} has no hash key", name)))?;
    let mut key_schema = KeySchema::new(hash);
    if let Some(range) = element(KeyType::Range)? {
        key_schema = key_schema.with_range(range);
    }

    let attribute_definitions = table
        .attribute_definitions()
        .iter()
        .filter_map(|d| {
            scalar_type(d.attribute_type()).map(|t| KeyElement::new(d.attribute_name(), t))
        })
        .collect();

    let throughput = table.provisioned_throughput();
    Ok(TableDescription {
        name: name.to_string(),
        key_schema,
        attribute_definitions,
        arn: table.table_arn().map(str::to_string),
        billing_mode: table
            .billing_mode_summary()
            .and_then(|b| b.billing_mode())
            .map(|m| m.as_str().to_string()),
        status: table
            .table_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        item_count: table.item_count(),
        size_bytes: table.table_size_bytes(),
        created_at: table.creation_date_time().map(|t| t.secs()),
        read_capacity: throughput.and_then(|t| t.read_capacity_units()),
        write_capacity: throughput.and_then(|t| t.write_capacity_units()),
        global_indexes: table
            .global_secondary_indexes()
            .iter()
            .filter_map(|i| i.index_name().map(str::to_string))
            .collect(),
        local_indexes: table
            .local_secondary_indexes()
            .iter()
            .filter_map(|i| i.index_name().map(str::to_string))
            .collect(),
    })
}

fn from_sdk_value(value: &sdk::AttributeValue) -> AttributeValue {
    match value {
        sdk::AttributeValue::S(s) => AttributeValue::S(s.clone()),
        sdk::AttributeValue::N(n) => AttributeValue::N(n.clone()),
        sdk::AttributeValue::B(b) => AttributeValue::B(b.as_ref().to_vec()),
        sdk::AttributeValue::Bool(b) => AttributeValue::Bool(*b),
        sdk::AttributeValue::Null(_) => AttributeValue::Null,
        sdk::AttributeValue::Ss(values) => AttributeValue::Ss(values.clone()),
        sdk::AttributeValue::Ns(values) => AttributeValue::Ns(values.clone()),
        sdk::AttributeValue::Bs(values) => {
            AttributeValue::Bs(values.iter().map(|b| b.as_ref().to_vec()).collect())
        }
        sdk::AttributeValue::L(values) => {
            AttributeValue::L(values.iter().map(from_sdk_value).collect())
        }
        sdk::AttributeValue::M(map) => {
            let mut entries: Vec<_> = map
                .iter()
                .map(|(k, v)| (k.clone(), from_sdk_value(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            AttributeValue::M(entries)
        }
        // Types added to the service after this client was written.
        _ => AttributeValue::Unknown(format!("{:?}", value)),
    }
}

/// Wire form of a value. `None` for values read back as [`AttributeValue::Unknown`].
fn to_sdk_value(value: &AttributeValue) -> Option<sdk::AttributeValue> {
    let converted = match value {
        AttributeValue::S(s) => sdk::AttributeValue::S(s.clone()),
        AttributeValue::N(n) => sdk::AttributeValue::N(n.clone()),
        AttributeValue::B(b) => sdk::AttributeValue::B(Blob::new(b.clone())),
        AttributeValue::Bool(b) => sdk::AttributeValue::Bool(*b),
        AttributeValue::Null => sdk::AttributeValue::Null(true),
        AttributeValue::Ss(values) => sdk::AttributeValue::Ss(values.clone()),
        AttributeValue::Ns(values) => sdk::AttributeValue::Ns(values.clone()),
        AttributeValue::Bs(values) => {
            sdk::AttributeValue::Bs(values.iter().map(|b| Blob::new(b.clone())).collect())
        }
        AttributeValue::L(values) => {
            sdk::AttributeValue::L(values.iter().map(to_sdk_value).collect::<Option<_>>()?)
        }
        AttributeValue::M(entries) => sdk::AttributeValue::M(
            entries
                .iter()
                .map(|(k, v)| Some((k.clone(), to_sdk_value(v)?)))
                .collect::<Option<_>>()?,
        ),
        AttributeValue::Unknown(_) => return None,
    };
    Some(converted)
}

fn convert_item(item: &HashMap<String, sdk::AttributeValue>) -> Item {
    Item::from_map(
        item.iter()
            .map(|(k, v)| (k.clone(), from_sdk_value(v)))
            .collect(),
    )
}

#[async_trait]
impl TableStore for DynamoStore {
    async fn list_tables(&self) -> ServiceResult<Vec<String>> {
        debug!("ListTables");
        let output = self
            .client
            .list_tables()
            .send()
            .await
            .map_err(|e| service_error("ListTables", e))?;
        Ok(output.table_names().to_vec())
    }

    async fn describe_table(&self, name: &str) -> ServiceResult<TableDescription> {
        debug!(table = name, "DescribeTable");
        let output = self
            .client
            .describe_table()
            .table_name(name)
            .send()
            .await
            .map_err(|e| service_error("DescribeTable", e))?;
        let table = output
            .table()
            .ok_or_else(|| ServiceError::new("DescribeTable", "response has no table"))?;
        convert_description("DescribeTable", table)
    }

    async fn scan_table(&self, name: &str) -> ServiceResult<Vec<Item>> {
        debug!(table = name, "Scan");
        let output = self
            .client
            .scan()
            .table_name(name)
            .send()
            .await
            .map_err(|e| service_error("Scan", e))?;
        Ok(output.items().iter().map(convert_item).collect())
    }

    async fn delete_table(&self, name: &str) -> ServiceResult<DeletedTable> {
        debug!(table = name, "DeleteTable");
        let output = self
            .client
            .delete_table()
            .table_name(name)
            .send()
            .await
            .map_err(|e| service_error("DeleteTable", e))?;
        let table_name = output
            .table_description()
            .and_then(|t| t.table_name())
            .unwrap_or(name)
            .to_string();
        Ok(DeletedTable { table_name })
    }

    async fn get_item(&self, name: &str, key: &PrimaryKey) -> ServiceResult<Option<Item>> {
        debug!(table = name, "GetItem");
        let key = key
            .attributes()
            .map(|attr| -> ServiceResult<(String, sdk::AttributeValue)> {
                let value = to_sdk_value(&attr.value).ok_or_else(|| {
                    ServiceError::new(
                        "GetItem",
                        format!("key attribute {} has an unsupported type", attr.name),
                    )
                })?;
                Ok((attr.name.clone(), value))
            })
            .collect::<ServiceResult<HashMap<_, _>>>()?;
        let output = self
            .client
            .get_item()
            .table_name(name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| service_error("GetItem", e))?;
        Ok(output.item().map(convert_item))
    }
}
