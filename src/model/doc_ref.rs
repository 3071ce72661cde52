//! DocRef — a stored pointer to a document in another collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

/// A foreign-document link stored in place of an embedded copy.
///
/// Carries the target collection and the raw identifier exactly as the
/// writing side stored it — no conversion happens until the reference is
/// resolved. Immutable once constructed. Serializes with the conventional
/// `$ref` / `$id` / `$db` wire keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRef {
    #[serde(rename = "$ref")]
    collection: String,
    #[serde(rename = "$id")]
    id: Value,
    #[serde(rename = "$db", skip_serializing_if = "Option::is_none", default)]
    database: Option<String>,
}

impl DocRef {
    pub fn new(collection: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            database: None,
        }
    }

    /// Point at a collection in another database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The raw, unconverted identifier value.
    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{db}.{}/{}", self.collection, self.id),
            None => write!(f, "{}/{}", self.collection, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let r = DocRef::new("orders", 42i64);
        assert_eq!(r.collection(), "orders");
        assert_eq!(r.id(), &Value::Int64(42));
        assert_eq!(r.database(), None);

        let r = r.with_database("shop");
        assert_eq!(r.database(), Some("shop"));
    }

    #[test]
    fn test_wire_keys() {
        let r = DocRef::new("orders", 42i64).with_database("shop");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["$ref"], "orders");
        assert_eq!(json["$db"], "shop");
        assert!(json.get("$id").is_some());

        let back: DocRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_display() {
        assert_eq!(DocRef::new("orders", 42i64).to_string(), "orders/42");
        assert_eq!(
            DocRef::new("orders", 42i64).with_database("shop").to_string(),
            "shop.orders/42"
        );
    }
}
