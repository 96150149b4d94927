//! Table, key and item representations shared by all stores.

use std::collections::HashMap;
use std::fmt;

/// Scalar attribute types allowed in a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// `S`
    String,
    /// `N`
    Number,
    /// `B`
    Binary,
}

impl ScalarType {
    /// Wire type tag.
    pub fn tag(&self) -> &'static str {
        match self {
            ScalarType::String => "S",
            ScalarType::Number => "N",
            ScalarType::Binary => "B",
        }
    }

    /// Parse a wire type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(ScalarType::String),
            "N" => Some(ScalarType::Number),
            "B" => Some(ScalarType::Binary),
            _ => None,
        }
    }

    /// Convert a typed command argument into a value of this type.
    ///
    /// Numbers keep their textual form but must parse as a finite number.
    /// Binary values take the UTF-8 bytes of the argument.
    pub fn parse_value(&self, raw: &str) -> Option<AttributeValue> {
        match self {
            ScalarType::String => Some(AttributeValue::S(raw.to_string())),
            ScalarType::Number => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|_| AttributeValue::N(raw.to_string())),
            ScalarType::Binary => Some(AttributeValue::B(raw.as_bytes().to_vec())),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One attribute of a primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    /// Attribute name.
    pub name: String,
    /// Attribute type.
    pub attr_type: ScalarType,
}

impl KeyElement {
    /// Create a key element.
    pub fn new(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }
}

/// Primary key schema of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Partition (hash) key.
    pub hash: KeyElement,
    /// Sort (range) key, if the table has one.
    pub range: Option<KeyElement>,
}

/// Reasons a primary key cannot be built from command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The table has a range key but no value was given.
    MissingRange(String),
    /// A range value was given for a hash-only table.
    UnexpectedRange,
    /// A value does not fit its key attribute's type.
    InvalidValue {
        attribute: String,
        attr_type: ScalarType,
        value: String,
    },
}

impl KeySchema {
    /// Hash-only schema.
    pub fn new(hash: KeyElement) -> Self {
        Self { hash, range: None }
    }

    /// Add a range key.
    pub fn with_range(mut self, range: KeyElement) -> Self {
        self.range = Some(range);
        self
    }

    /// Build a primary key from raw command arguments.
    pub fn primary_key(&self, hash: &str, range: Option<&str>) -> Result<PrimaryKey, KeyError> {
        let hash = typed(&self.hash, hash)?;
        let range = match (&self.range, range) {
            (Some(element), Some(raw)) => Some(typed(element, raw)?),
            (Some(element), None) => return Err(KeyError::MissingRange(element.name.clone())),
            (None, Some(_)) => return Err(KeyError::UnexpectedRange),
            (None, None) => None,
        };
        Ok(PrimaryKey { hash, range })
    }
}

fn typed(element: &KeyElement, raw: &str) -> Result<KeyAttribute, KeyError> {
    let value = element
        .attr_type
        .parse_value(raw)
        .ok_or_else(|| KeyError::InvalidValue {
            attribute: element.name.clone(),
            attr_type: element.attr_type,
            value: raw.to_string(),
        })?;
    Ok(KeyAttribute {
        name: element.name.clone(),
        value,
    })
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HASH {} ({})", self.hash.name, self.hash.attr_type)?;
        if let Some(range) = &self.range {
            write!(f, ", RANGE {} ({})", range.name, range.attr_type)?;
        }
        Ok(())
    }
}

/// A named key value.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: AttributeValue,
}

/// Full primary key of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    /// Hash key value.
    pub hash: KeyAttribute,
    /// Range key value, for tables that have one.
    pub range: Option<KeyAttribute>,
}

impl PrimaryKey {
    /// Iterate over the key attributes, hash first.
    pub fn attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.hash).chain(self.range.iter())
    }

    /// Check whether an item carries this key.
    pub fn matches(&self, item: &Item) -> bool {
        self.attributes()
            .all(|attr| item.get(&attr.name) == Some(&attr.value))
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, kept in its textual form.
    N(String),
    /// Binary.
    B(Vec<u8>),
    /// Boolean.
    Bool(bool),
    /// Null.
    Null,
    /// String set.
    Ss(Vec<String>),
    /// Number set.
    Ns(Vec<String>),
    /// Binary set.
    Bs(Vec<Vec<u8>>),
    /// List.
    L(Vec<AttributeValue>),
    /// Map, ordered by key.
    M(Vec<(String, AttributeValue)>),
    /// A type this client does not know, in its debug form.
    Unknown(String),
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }
    Ok(())
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    values: &[T],
    mut each: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(f, v)?;
    }
    f.write_str("]")
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) => write!(f, "{{S: {}}}", s),
            AttributeValue::N(n) => write!(f, "{{N: {}}}", n),
            AttributeValue::B(b) => {
                f.write_str("{B: ")?;
                write_hex(f, b)?;
                f.write_str("}")
            }
            AttributeValue::Bool(b) => write!(f, "{{BOOL: {}}}", b),
            AttributeValue::Null => f.write_str("{NULL: true}"),
            AttributeValue::Ss(values) => {
                f.write_str("{SS: ")?;
                write_list(f, values, |f, v| f.write_str(v))?;
                f.write_str("}")
            }
            AttributeValue::Ns(values) => {
                f.write_str("{NS: ")?;
                write_list(f, values, |f, v| f.write_str(v))?;
                f.write_str("}")
            }
            AttributeValue::Bs(values) => {
                f.write_str("{BS: ")?;
                write_list(f, values, |f, v| write_hex(f, v))?;
                f.write_str("}")
            }
            AttributeValue::L(values) => {
                f.write_str("{L: ")?;
                write_list(f, values, |f, v| write!(f, "{}", v))?;
                f.write_str("}")
            }
            AttributeValue::M(entries) => {
                f.write_str("{M: {")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}}")
            }
            AttributeValue::Unknown(raw) => write!(f, "{{?: {}}}", raw),
        }
    }
}

/// One record: attribute names with typed values, in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    attributes: Vec<(String, AttributeValue)>,
}

impl Item {
    /// Create an empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an attribute.
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an attribute, keeping insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Build an item from an unordered map, sorted by attribute name.
    pub fn from_map(map: HashMap<String, AttributeValue>) -> Self {
        let mut attributes: Vec<_> = map.into_iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(&b.0));
        Self { attributes }
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Iterate over attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the item has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Description of a table as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    /// Table name.
    pub name: String,
    /// Primary key schema.
    pub key_schema: KeySchema,
    /// Declared attribute names and types.
    pub attribute_definitions: Vec<KeyElement>,
    /// Table status, e.g. `ACTIVE`.
    pub status: String,
    /// Amazon Resource Name.
    pub arn: Option<String>,
    /// Billing mode, e.g. `PAY_PER_REQUEST`.
    pub billing_mode: Option<String>,
    /// Approximate item count.
    pub item_count: Option<i64>,
    /// Approximate size in bytes.
    pub size_bytes: Option<i64>,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: Option<i64>,
    /// Provisioned read capacity units.
    pub read_capacity: Option<i64>,
    /// Provisioned write capacity units.
    pub write_capacity: Option<i64>,
    /// Global secondary index names.
    pub global_indexes: Vec<String>,
    /// Local secondary index names.
    pub local_indexes: Vec<String>,
}

impl TableDescription {
    /// Minimal active description. Only the key attributes are declared.
    pub fn new(name: impl Into<String>, key_schema: KeySchema) -> Self {
        let attribute_definitions = std::iter::once(key_schema.hash.clone())
            .chain(key_schema.range.clone())
            .collect();
        Self {
            name: name.into(),
            key_schema,
            attribute_definitions,
            status: "ACTIVE".to_string(),
            arn: None,
            billing_mode: None,
            item_count: None,
            size_bytes: None,
            created_at: None,
            read_capacity: None,
            write_capacity: None,
            global_indexes: Vec::new(),
            local_indexes: Vec::new(),
        }
    }
}

impl fmt::Display for TableDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.name)?;
        if let Some(arn) = &self.arn {
            writeln!(f, "  ARN: {}", arn)?;
        }
        writeln!(f, "  Status: {}", self.status)?;
        write!(f, "  Key schema: {}", self.key_schema)?;
        if !self.attribute_definitions.is_empty() {
            let attributes: Vec<_> = self
                .attribute_definitions
                .iter()
                .map(|a| format!("{} ({})", a.name, a.attr_type))
                .collect();
            write!(f, "\n  Attributes: {}", attributes.join(", "))?;
        }
        if let Some(mode) = &self.billing_mode {
            write!(f, "\n  Billing mode: {}", mode)?;
        }
        if let Some(count) = self.item_count {
            write!(f, "\n  Item count: {}", count)?;
        }
        if let Some(size) = self.size_bytes {
            write!(f, "\n  Size (bytes): {}", size)?;
        }
        if let Some(created) = self.created_at {
            write!(f, "\n  Created at (epoch seconds): {}", created)?;
        }
        if self.read_capacity.is_some() || self.write_capacity.is_some() {
            write!(
                f,
                "\n  Provisioned throughput: read {}, write {}",
                self.read_capacity.unwrap_or(0),
                self.write_capacity.unwrap_or(0)
            )?;
        }
        if !self.global_indexes.is_empty() {
            write!(f, "\n  Global secondary indexes: {}", self.global_indexes.join(", "))?;
        }
        if !self.local_indexes.is_empty() {
            write!(f, "\n  Local secondary indexes: {}", self.local_indexes.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a successful table deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedTable {
    /// Name of the deleted table, as returned by the service.
    pub table_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite() -> KeySchema {
        KeySchema::new(KeyElement::new("user", ScalarType::String))
            .with_range(KeyElement::new("ts", ScalarType::Number))
    }

    #[test]
    fn test_scalar_tags() {
        for t in [ScalarType::String, ScalarType::Number, ScalarType::Binary] {
            assert_eq!(ScalarType::from_tag(t.tag()), Some(t));
        }
        assert_eq!(ScalarType::from_tag("BOOL"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(
            ScalarType::Number.parse_value("42.5"),
            Some(AttributeValue::N("42.5".into()))
        );
        assert_eq!(ScalarType::Number.parse_value("forty"), None);
        assert_eq!(ScalarType::Number.parse_value("inf"), None);
    }

    #[test]
    fn test_parse_binary_uses_bytes() {
        assert_eq!(
            ScalarType::Binary.parse_value("ab"),
            Some(AttributeValue::B(vec![b'a', b'b']))
        );
    }

    #[test]
    fn test_key_schema_display() {
        assert_eq!(composite().to_string(), "HASH user (S), RANGE ts (N)");
        let hash_only = KeySchema::new(KeyElement::new("id", ScalarType::Binary));
        assert_eq!(hash_only.to_string(), "HASH id (B)");
    }

    #[test]
    fn test_primary_key_composite() {
        let key = composite().primary_key("alice", Some("17")).unwrap();
        assert_eq!(key.hash.name, "user");
        assert_eq!(key.hash.value, AttributeValue::S("alice".into()));
        assert_eq!(key.range.unwrap().value, AttributeValue::N("17".into()));
    }

    #[test]
    fn test_primary_key_missing_range() {
        assert_eq!(
            composite().primary_key("alice", None),
            Err(KeyError::MissingRange("ts".into()))
        );
    }

    #[test]
    fn test_primary_key_unexpected_range() {
        let schema = KeySchema::new(KeyElement::new("id", ScalarType::String));
        assert_eq!(
            schema.primary_key("a", Some("b")),
            Err(KeyError::UnexpectedRange)
        );
    }

    #[test]
    fn test_primary_key_invalid_number() {
        let err = composite().primary_key("alice", Some("soon")).unwrap_err();
        assert!(matches!(err, KeyError::InvalidValue { ref attribute, .. } if attribute == "ts"));
    }

    #[test]
    fn test_primary_key_matches_item() {
        let key = composite().primary_key("alice", Some("1")).unwrap();
        let item = Item::new()
            .with("user", AttributeValue::S("alice".into()))
            .with("ts", AttributeValue::N("1".into()))
            .with("body", AttributeValue::S("hi".into()));
        assert!(key.matches(&item));

        let other = item.clone().with("ts", AttributeValue::N("2".into()));
        assert!(!key.matches(&other));
    }

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::S("Bob".into()).to_string(), "{S: Bob}");
        assert_eq!(AttributeValue::N("7".into()).to_string(), "{N: 7}");
        assert_eq!(AttributeValue::B(vec![0xde, 0xad]).to_string(), "{B: 0xdead}");
        assert_eq!(AttributeValue::Null.to_string(), "{NULL: true}");
        assert_eq!(
            AttributeValue::Ss(vec!["a".into(), "b".into()]).to_string(),
            "{SS: [a, b]}"
        );
        assert_eq!(
            AttributeValue::M(vec![("k".into(), AttributeValue::Bool(false))]).to_string(),
            "{M: {k: {BOOL: false}}}"
        );
        assert_eq!(
            AttributeValue::L(vec![AttributeValue::N("1".into())]).to_string(),
            "{L: [{N: 1}]}"
        );
        assert_eq!(
            AttributeValue::Unknown("Vector([1.0])".into()).to_string(),
            "{?: Vector([1.0])}"
        );
    }

    #[test]
    fn test_item_from_map_is_sorted() {
        let mut map = HashMap::new();
        map.insert("zeta".to_string(), AttributeValue::Null);
        map.insert("alpha".to_string(), AttributeValue::Bool(true));
        let item = Item::from_map(map);
        let names: Vec<_> = item.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_item_insert_replaces() {
        let mut item = Item::new().with("a", AttributeValue::Null);
        item.insert("a", AttributeValue::Bool(true));
        assert_eq!(item.len(), 1);
        assert_eq!(item.get("a"), Some(&AttributeValue::Bool(true)));
    }

    #[test]
    fn test_description_display() {
        let mut desc = TableDescription::new("Users", composite());
        desc.item_count = Some(3);
        desc.read_capacity = Some(5);
        desc.write_capacity = Some(1);

        let text = desc.to_string();
        assert!(text.starts_with("Table: Users\n"));
        assert!(text.contains("Status: ACTIVE"));
        assert!(text.contains("Key schema: HASH user (S), RANGE ts (N)"));
        assert!(text.contains("Item count: 3"));
        assert!(text.contains("Provisioned throughput: read 5, write 1"));
        assert!(text.contains("Attributes: user (S), ts (N)"));
        assert!(!text.contains("Size"));
        assert!(!text.contains("indexes"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_description_display_indexes_and_billing() {
        let mut desc = TableDescription::new("Users", composite());
        desc.arn = Some("arn:aws:dynamodb:us-east-1:123456789012:table/Users".into());
        desc.billing_mode = Some("PAY_PER_REQUEST".into());
        desc.attribute_definitions
            .push(KeyElement::new("email", ScalarType::String));
        desc.global_indexes = vec!["by_email".into()];
        desc.local_indexes = vec!["by_kind".into(), "by_day".into()];

        let text = desc.to_string();
        assert!(text.contains("ARN: arn:aws:dynamodb:us-east-1:123456789012:table/Users"));
        assert!(text.contains("Billing mode: PAY_PER_REQUEST"));
        assert!(text.contains("Attributes: user (S), ts (N), email (S)"));
        assert!(text.contains("Global secondary indexes: by_email"));
        assert!(text.ends_with("Local secondary indexes: by_kind, by_day"));
    }
}
