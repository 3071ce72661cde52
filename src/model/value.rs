//! Universal value type for stored document fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocRef, Document, ObjectId};

/// A value as it appears in a stored document.
///
/// Covers the storage type system:
/// - Scalars: Bool, Int32, Int64, Double, String, Bytes
/// - Containers: Array, Document
/// - Identity: ObjectId
/// - Temporal: DateTime
/// - Indirection: Ref (a pointer to a document in another collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Document(Box<Document>),
    ObjectId(ObjectId),
    DateTime(DateTime<Utc>),
    Ref(Box<DocRef>),
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int32(_) => "INT32",
            Value::Int64(_) => "INT64",
            Value::Double(_) => "DOUBLE",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::Array(_) => "ARRAY",
            Value::Document(_) => "DOCUMENT",
            Value::ObjectId(_) => "OBJECT_ID",
            Value::DateTime(_) => "DATE_TIME",
            Value::Ref(_) => "REF",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
    pub fn is_numeric(&self) -> bool { matches!(self, Value::Int32(_) | Value::Int64(_) | Value::Double(_)) }
    pub fn is_string(&self) -> bool { matches!(self, Value::String(_)) }

    /// Attempt to extract as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            Value::Double(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(i) => Some(*i as f64),
            Value::Int64(i) => Some(*i as f64),
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempt to extract as &str.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempt to extract as a document.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(&**d),
            _ => None,
        }
    }

    /// Attempt to extract as a reference pointer.
    pub fn as_ref_pointer(&self) -> Option<&DocRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int32(v) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int64(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Double(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<ObjectId> for Value { fn from(v: ObjectId) -> Self { Value::ObjectId(v) } }
impl From<DateTime<Utc>> for Value { fn from(v: DateTime<Utc>) -> Self { Value::DateTime(v) } }
impl From<DocRef> for Value { fn from(v: DocRef) -> Self { Value::Ref(Box::new(v)) } }
impl From<Document> for Value { fn from(v: Document) -> Self { Value::Document(Box::new(v)) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::Array(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

/// Ingest raw JSON. Whole-number JSON values land in the narrowest integer
/// that holds them, matching how the wire layer reads stored documents.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => Value::Int32(i as i32),
                Some(i) => Value::Int64(i),
                None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                Value::Document(Box::new(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect()))
            }
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
            Value::Array(a) => {
                write!(f, "[")?;
                for (i, v) in a.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Document(d) => write!(f, "{d}"),
            Value::ObjectId(oid) => write!(f, "{oid}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Ref(r) => write!(f, "{r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("hello"), Value::String("hello".into()));
        assert_eq!(Value::from(42i32), Value::Int32(42));
        assert_eq!(Value::from(42i64), Value::Int64(42));
        assert_eq!(Value::from(3.14), Value::Double(3.14));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_as_i64_coercions() {
        assert_eq!(Value::Int32(7).as_i64(), Some(7));
        assert_eq!(Value::Int64(7).as_i64(), Some(7));
        assert_eq!(Value::Double(7.0).as_i64(), Some(7));
        assert_eq!(Value::Double(7.5).as_i64(), None);
        assert_eq!(Value::String("7".into()).as_i64(), None);
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::json!({
            "name": "Ada",
            "age": 3,
            "big": 9_000_000_000i64,
            "score": 1.5,
        });
        let value = Value::from(json);
        let doc = value.as_document().unwrap();
        assert_eq!(doc.get("name"), Some(&Value::String("Ada".into())));
        assert_eq!(doc.get("age"), Some(&Value::Int32(3)));
        assert_eq!(doc.get("big"), Some(&Value::Int64(9_000_000_000)));
        assert_eq!(doc.get("score"), Some(&Value::Double(1.5)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::String("x".into()).to_string(), "\"x\"");
        assert_eq!(Value::Array(vec![Value::Int32(1), Value::Int32(2)]).to_string(), "[1, 2]");
    }
}
