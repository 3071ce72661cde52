//! Document — the ordered field map mapped entities read from and write to.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use super::Value;

/// An insertion-ordered mapping of field names to values.
///
/// Field order is preserved: stored documents are order-sensitive on the
/// wire. Most documents carry a handful of fields (the conversion pipeline
/// routinely builds single-field ones), so entries stay inline until they
/// outgrow the stack allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: SmallVec<[(String, Value); 4]>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field document, e.g. `Document::of("_id", 42i64)`.
    pub fn of(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut doc = Self::new();
        doc.insert(field, value);
        doc
    }

    /// Insert a field. An existing field keeps its position and has its
    /// previous value returned.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == field) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((field, value));
        None
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == field)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (field, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ============================================================================
// Iteration / collection
// ============================================================================

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (field, value) in iter {
            doc.insert(field, value);
        }
        doc
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Document {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = smallvec::IntoIter<[(String, Value); 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ============================================================================
// Serde (as a plain map, order preserved)
// ============================================================================

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a field map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Document, A::Error> {
                let mut doc = Document::new();
                while let Some((field, value)) = access.next_entry::<String, Value>()? {
                    doc.insert(field, value);
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{field}: {value}")?;
        }
        write!(f, "}}")
    }
}
