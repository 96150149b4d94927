//! In-process table store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{
    DeletedTable, Item, KeyAttribute, PrimaryKey, ServiceError, ServiceResult, TableDescription,
    TableStore,
};

const ACTIVE: &str = "ACTIVE";

#[derive(Debug, Clone)]
struct MemoryTable {
    description: TableDescription,
    items: Vec<Item>,
}

/// Thread-safe in-memory tables behaving like the remote service.
///
/// Tables are listed in name order. A table whose status is not `ACTIVE`
/// cannot be deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, MemoryTable>>,
}

fn not_found(operation: &'static str, name: &str) -> ServiceError {
    ServiceError::new(
        operation,
        format!("Requested resource not found: Table: {} not found", name),
    )
}

fn poisoned(operation: &'static str) -> ServiceError {
    ServiceError::new(operation, "internal lock poisoned")
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table.
    pub fn create_table(&self, description: TableDescription) -> ServiceResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| poisoned("CreateTable"))?;

        if tables.contains_key(&description.name) {
            return Err(ServiceError::new(
                "CreateTable",
                format!("Table already exists: {}", description.name),
            ));
        }

        tables.insert(
            description.name.clone(),
            MemoryTable {
                description,
                items: Vec::new(),
            },
        );
        Ok(())
    }

    /// Insert an item, replacing any item with the same primary key.
    pub fn put_item(&self, table: &str, item: Item) -> ServiceResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned("PutItem"))?;
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| not_found("PutItem", table))?;

        let key = item_key(&entry.description, &item)?;
        entry.items.retain(|existing| !key.matches(existing));
        entry.items.push(item);
        Ok(())
    }

    /// Change a table's status, e.g. to `CREATING`.
    pub fn set_table_status(&self, table: &str, status: &str) -> ServiceResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| poisoned("UpdateTable"))?;
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| not_found("UpdateTable", table))?;
        entry.description.status = status.to_string();
        Ok(())
    }

    /// Check if a table exists.
    pub fn contains(&self, table: &str) -> bool {
        self.tables
            .read()
            .map(|t| t.contains_key(table))
            .unwrap_or(false)
    }
}

fn item_key(description: &TableDescription, item: &Item) -> ServiceResult<PrimaryKey> {
    let schema = &description.key_schema;
    let attribute = |name: &str| -> ServiceResult<KeyAttribute> {
        item.get(name)
            .map(|value| KeyAttribute {
                name: name.to_string(),
                value: value.clone(),
            })
            .ok_or_else(|| {
                ServiceError::new(
                    "PutItem",
                    format!("One of the required keys was not given a value: {}", name),
                )
            })
    };

    Ok(PrimaryKey {
        hash: attribute(schema.hash.name.as_str())?,
        range: match &schema.range {
            Some(range) => Some(attribute(range.name.as_str())?),
            None => None,
        },
    })
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list_tables(&self) -> ServiceResult<Vec<String>> {
        let tables = self.tables.read().map_err(|_| poisoned("ListTables"))?;
        Ok(tables.keys().cloned().collect())
    }

    async fn describe_table(&self, name: &str) -> ServiceResult<TableDescription> {
        let tables = self
            .tables
            .read()
            .map_err(|_| poisoned("DescribeTable"))?;
        let entry = tables
            .get(name)
            .ok_or_else(|| not_found("DescribeTable", name))?;

        let mut description = entry.description.clone();
        description.item_count = Some(entry.items.len() as i64);
        Ok(description)
    }

    async fn scan_table(&self, name: &str) -> ServiceResult<Vec<Item>> {
        let tables = self.tables.read().map_err(|_| poisoned("Scan"))?;
        let entry = tables.get(name).ok_or_else(|| not_found("Scan", name))?;
        Ok(entry.items.clone())
    }

    async fn delete_table(&self, name: &str) -> ServiceResult<DeletedTable> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| poisoned("DeleteTable"))?;
        let entry = tables
            .get(name)
            .ok_or_else(|| not_found("DeleteTable", name))?;

        if entry.description.status != ACTIVE {
            return Err(ServiceError::new(
                "DeleteTable",
                format!(
                    "Attempt to change a resource which is still in use: Table {} is {}",
                    name, entry.description.status
                ),
            ));
        }

        tables.remove(name);
        Ok(DeletedTable {
            table_name: name.to_string(),
        })
    }

    async fn get_item(&self, name: &str, key: &PrimaryKey) -> ServiceResult<Option<Item>> {
        let tables = self.tables.read().map_err(|_| poisoned("GetItem"))?;
        let entry = tables.get(name).ok_or_else(|| not_found("GetItem", name))?;
        Ok(entry.items.iter().find(|item| key.matches(item)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AttributeValue, KeyElement, KeySchema, ScalarType};

    fn users() -> TableDescription {
        TableDescription::new(
            "Users",
            KeySchema::new(KeyElement::new("id", ScalarType::String)),
        )
    }

    fn user(id: &str, name: &str) -> Item {
        Item::new()
            .with("id", AttributeValue::S(id.into()))
            .with("name", AttributeValue::S(name.into()))
    }

    #[tokio::test]
    async fn test_list_tables_sorted() {
        let store = MemoryStore::new();
        store
            .create_table(TableDescription::new(
                "Users",
                KeySchema::new(KeyElement::new("id", ScalarType::String)),
            ))
            .unwrap();
        store
            .create_table(TableDescription::new(
                "Orders",
                KeySchema::new(KeyElement::new("id", ScalarType::Number)),
            ))
            .unwrap();

        let names = store.list_tables().await.unwrap();
        assert_eq!(names, vec!["Orders", "Users"]);
    }

    #[test]
    fn test_deleted_table_is_gone() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();

        let deleted = tokio_test::block_on(store.delete_table("Users")).unwrap();
        assert_eq!(deleted.table_name, "Users");
        assert!(!store.contains("Users"));
        assert!(tokio_test::block_on(store.list_tables()).unwrap().is_empty());
    }

    #[test]
    fn test_create_duplicate() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        assert!(store.create_table(users()).is_err());
    }

    #[tokio::test]
    async fn test_describe_counts_items() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        store.put_item("Users", user("1", "Ann")).unwrap();
        store.put_item("Users", user("2", "Bob")).unwrap();

        let desc = store.describe_table("Users").await.unwrap();
        assert_eq!(desc.item_count, Some(2));
        assert_eq!(desc.key_schema.hash.name, "id");
    }

    #[tokio::test]
    async fn test_describe_missing() {
        let store = MemoryStore::new();
        let err = store.describe_table("Nope").await.unwrap_err();
        assert_eq!(err.operation, "DescribeTable");
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_put_replaces_same_key() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        store.put_item("Users", user("1", "Ann")).unwrap();
        store.put_item("Users", user("1", "Anna")).unwrap();

        let items = store.scan_table("Users").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("name"), Some(&AttributeValue::S("Anna".into())));
    }

    #[test]
    fn test_put_requires_key() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        let item = Item::new().with("name", AttributeValue::S("Ann".into()));
        assert!(store.put_item("Users", item).is_err());
    }

    #[tokio::test]
    async fn test_get_item() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        store.put_item("Users", user("1", "Ann")).unwrap();

        let schema = users().key_schema;
        let hit = store
            .get_item("Users", &schema.primary_key("1", None).unwrap())
            .await
            .unwrap();
        assert_eq!(hit, Some(user("1", "Ann")));

        let miss = store
            .get_item("Users", &schema.primary_key("9", None).unwrap())
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_delete_table() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();

        let deleted = store.delete_table("Users").await.unwrap();
        assert_eq!(deleted.table_name, "Users");
        assert!(!store.contains("Users"));
        assert!(store.delete_table("Users").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_refused_while_not_active() {
        let store = MemoryStore::new();
        store.create_table(users()).unwrap();
        store.set_table_status("Users", "CREATING").unwrap();

        let err = store.delete_table("Users").await.unwrap_err();
        assert!(err.message.contains("in use"));
        assert!(store.contains("Users"));
    }
}
