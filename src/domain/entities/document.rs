//! Store-agnostic document model.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a document id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single field value as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
    String(String),
    Array(Vec<FieldValue>),
    Map(Fields),
}

impl FieldValue {
    /// Returns the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp content, if this is a timestamp value.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Rank of the value's type in the store's cross-type ordering.
    const fn type_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Double(_) => 2,
            Self::Timestamp(_) => 3,
            Self::String(_) => 4,
            Self::Array(_) => 5,
            Self::Map(_) => 6,
        }
    }

    /// Total ordering used when sorting query results.
    ///
    /// Values of different types order by type first (null, booleans,
    /// numbers, timestamps, strings, arrays, maps).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn store_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Integer(a), Self::Double(b)) => (*a as f64).total_cmp(b),
            (Self::Double(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Array(a), Self::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.store_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Field name to value mapping of a document.
pub type Fields = BTreeMap<String, FieldValue>;

/// A document read from the store, fields verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    pub id: DocumentId,
    /// Stored fields.
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    /// Creates a document.
    #[must_use]
    pub fn new(id: impl Into<DocumentId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a string field, or `None` when absent or not a string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_str)
    }
}

/// Opaque position within an ordered result set.
///
/// Produced by a store for every record of a page and only meaningful when
/// handed back to the same store as a "start after" bound.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    sort_value: Option<FieldValue>,
    document_id: DocumentId,
}

impl PageCursor {
    /// Creates a cursor. Intended for store adapters.
    #[must_use]
    pub const fn new(sort_value: Option<FieldValue>, document_id: DocumentId) -> Self {
        Self {
            sort_value,
            document_id,
        }
    }

    /// Sort key captured by the store.
    #[must_use]
    pub const fn sort_value(&self) -> Option<&FieldValue> {
        self.sort_value.as_ref()
    }

    /// Document the cursor points at.
    #[must_use]
    pub const fn document_id(&self) -> &DocumentId {
        &self.document_id
    }
}

/// A document together with its cursor in the query that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// The document.
    pub document: Document,
    /// Position of the document in the ordered result.
    pub cursor: PageCursor,
}

/// Lenient projection of a raw document into a typed record.
///
/// Implementations must not fail: missing or mistyped fields become empty or
/// absent values.
pub trait FromDocument: Sized {
    /// Builds the record from a document.
    fn from_document(document: Document) -> Self;
}

impl FromDocument for Document {
    fn from_document(document: Document) -> Self {
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_cmp_orders_by_type_first() {
        let null = FieldValue::Null;
        let number = FieldValue::Integer(10);
        let text = FieldValue::from("a");

        assert_eq!(null.store_cmp(&number), Ordering::Less);
        assert_eq!(text.store_cmp(&number), Ordering::Greater);
    }

    #[test]
    fn test_store_cmp_mixed_numbers() {
        assert_eq!(
            FieldValue::Integer(2).store_cmp(&FieldValue::Double(2.5)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Double(3.0).store_cmp(&FieldValue::Integer(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_str_field_ignores_other_types() {
        let mut fields = Fields::new();
        fields.insert("title".into(), FieldValue::from("Rust"));
        fields.insert("seats".into(), FieldValue::Integer(30));
        let doc = Document::new("c1", fields);

        assert_eq!(doc.str_field("title"), Some("Rust"));
        assert_eq!(doc.str_field("seats"), None);
        assert_eq!(doc.str_field("missing"), None);
    }
}
