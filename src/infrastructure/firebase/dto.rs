use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Document, DocumentId, FieldValue, Fields};

/// Google API error envelope shared by Identity Toolkit and Firestore.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Email and password request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Response of `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds, as a decimal string.
    pub expires_in: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

/// Response of the secure token endpoint.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest<'a> {
    pub id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUser {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
}

/// Firestore typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// 64-bit integers travel as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::NullValue(()) => Self::Null,
            Value::BooleanValue(b) => Self::Boolean(b),
            Value::IntegerValue(raw) => raw.parse().map_or(Self::String(raw), Self::Integer),
            Value::DoubleValue(d) => Self::Double(d),
            Value::TimestampValue(ts) => Self::Timestamp(ts),
            Value::StringValue(s) | Value::BytesValue(s) | Value::ReferenceValue(s) => {
                Self::String(s)
            }
            Value::GeoPointValue(point) => {
                let mut fields = Fields::new();
                fields.insert("latitude".into(), Self::Double(point.latitude));
                fields.insert("longitude".into(), Self::Double(point.longitude));
                Self::Map(fields)
            }
            Value::ArrayValue(array) => Self::Array(array.values.into_iter().map(Into::into).collect()),
            Value::MapValue(map) => Self::Map(from_wire_fields(map.fields)),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => Self::NullValue(()),
            FieldValue::Boolean(b) => Self::BooleanValue(*b),
            FieldValue::Integer(i) => Self::IntegerValue(i.to_string()),
            FieldValue::Double(d) => Self::DoubleValue(*d),
            FieldValue::Timestamp(ts) => Self::TimestampValue(*ts),
            FieldValue::String(s) => Self::StringValue(s.clone()),
            FieldValue::Array(values) => Self::ArrayValue(ArrayValue {
                values: values.iter().map(Into::into).collect(),
            }),
            FieldValue::Map(fields) => Self::MapValue(MapValue {
                fields: to_wire_fields(fields),
            }),
        }
    }
}

#[must_use]
pub fn from_wire_fields(fields: BTreeMap<String, Value>) -> Fields {
    fields.into_iter().map(|(k, v)| (k, v.into())).collect()
}

#[must_use]
pub fn to_wire_fields(fields: &Fields) -> BTreeMap<String, Value> {
    fields.iter().map(|(k, v)| (k.clone(), v.into())).collect()
}

/// Firestore document resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    /// Full resource name ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl WireDocument {
    /// Last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        let id = DocumentId::new(self.id());
        Document::new(id, from_wire_fields(self.fields))
    }
}

#[derive(Debug, Serialize)]
pub struct WriteDocument {
    pub fields: BTreeMap<String, Value>,
}

/// One element of the `runQuery` response stream.
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
    #[serde(default)]
    pub document: Option<WireDocument>,
}

/// One element of the `runAggregationQuery` response stream.
#[derive(Debug, Deserialize)]
pub struct AggregationItem {
    #[serde(default)]
    pub result: Option<AggregationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    #[serde(default)]
    pub aggregate_fields: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAggregationQueryRequest {
    pub structured_aggregation_query: StructuredAggregationQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAggregationQuery {
    pub structured_query: StructuredQuery,
    pub aggregations: Vec<Aggregation>,
}

#[derive(Debug, Serialize)]
pub struct Aggregation {
    pub alias: String,
    pub count: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<QueryCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: &'static str,
}

impl Order {
    #[must_use]
    pub fn ascending(field_path: impl Into<String>) -> Self {
        Self {
            field: FieldReference {
                field_path: field_path.into(),
            },
            direction: "ASCENDING",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

/// Position in the ordered result; `before: false` starts right after it.
#[derive(Debug, Serialize)]
pub struct QueryCursor {
    pub values: Vec<Value>,
    pub before: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_decodes_typed_values() {
        let raw = json!({
            "name": "projects/p/databases/(default)/documents/courses/abc123",
            "fields": {
                "title": { "stringValue": "Operating Systems" },
                "seats": { "integerValue": "120" },
                "rating": { "doubleValue": 4.5 },
                "archived": { "booleanValue": false },
                "note": { "nullValue": null },
                "created_at": { "timestampValue": "2024-09-01T08:00:00Z" },
                "tags": { "arrayValue": { "values": [{ "stringValue": "core" }] } },
                "campus": { "geoPointValue": { "latitude": 51.5, "longitude": -0.1 } }
            },
            "createTime": "2024-09-01T08:00:00.123Z"
        });

        let doc: WireDocument = serde_json::from_value(raw).unwrap();
        let doc = doc.into_document();

        assert_eq!(doc.id.as_str(), "abc123");
        assert_eq!(doc.str_field("title"), Some("Operating Systems"));
        assert_eq!(doc.field("seats"), Some(&FieldValue::Integer(120)));
        assert_eq!(doc.field("note"), Some(&FieldValue::Null));
        assert!(doc.field("created_at").and_then(FieldValue::as_timestamp).is_some());
        assert_eq!(
            doc.field("tags"),
            Some(&FieldValue::Array(vec![FieldValue::from("core")]))
        );
        assert!(matches!(doc.field("campus"), Some(FieldValue::Map(_))));
    }

    #[test]
    fn test_integer_encodes_as_string() {
        let wire = Value::from(&FieldValue::Integer(42));
        assert_eq!(serde_json::to_value(&wire).unwrap(), json!({ "integerValue": "42" }));
    }

    #[test]
    fn test_query_shape() {
        let query = RunQueryRequest {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: "courses".into(),
                }],
                order_by: vec![Order::ascending("created_at"), Order::ascending("__name__")],
                start_at: Some(QueryCursor {
                    values: vec![Value::StringValue("x".into())],
                    before: false,
                }),
                limit: Some(15),
            },
        };

        let body = serde_json::to_value(&query).unwrap();
        let structured = &body["structuredQuery"];
        assert_eq!(structured["from"][0]["collectionId"], "courses");
        assert_eq!(structured["orderBy"][1]["field"]["fieldPath"], "__name__");
        assert_eq!(structured["startAt"]["before"], false);
        assert_eq!(structured["limit"], 15);
    }

    #[test]
    fn test_error_envelope() {
        let raw = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.error.message, "EMAIL_EXISTS");
        assert_eq!(envelope.error.code, 400);
    }
}
