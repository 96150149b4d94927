//! Storage client adapter.
//!
//! The shell talks to the table service only through [`TableStore`]. Every
//! operation is a single request/response round trip; failures of any kind
//! are reported as a [`ServiceError`].
//!
//! - [`DynamoStore`]: Amazon DynamoDB via `aws-sdk-dynamodb`
//! - [`MemoryStore`]: in-process tables, used by tests

mod dynamo;
mod memory;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use dynamo::{DynamoStore, ServiceSettings};
pub use memory::MemoryStore;
pub use types::{
    AttributeValue, DeletedTable, Item, KeyAttribute, KeyElement, KeyError, KeySchema,
    PrimaryKey, ScalarType, TableDescription,
};

/// Failure reported by the table service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct ServiceError {
    /// Service operation that failed, e.g. `DescribeTable`.
    pub operation: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl ServiceError {
    /// Create a service error.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Request/response interface to the table service.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Names of all tables (first page only).
    async fn list_tables(&self) -> ServiceResult<Vec<String>>;

    /// Describe a table, including its key schema.
    async fn describe_table(&self, name: &str) -> ServiceResult<TableDescription>;

    /// Read every item of a table (first page only).
    async fn scan_table(&self, name: &str) -> ServiceResult<Vec<Item>>;

    /// Delete a table.
    async fn delete_table(&self, name: &str) -> ServiceResult<DeletedTable>;

    /// Fetch one item by primary key.
    async fn get_item(&self, name: &str, key: &PrimaryKey) -> ServiceResult<Option<Item>>;
}
