//! # Lazy Reference Proxies
//!
//! `LazyProxy` is the crate's reference implementation of the mutation
//! contract: an opaque stand-in for a referenced entity whose identifier is
//! populated immediately and whose remaining fields arrive on first real
//! access.
//!
//! Proxy *generation* (interception, call weaving) lives outside this crate;
//! anything implementing `PropertyHolder` can take this type's place.

use crate::mapping::PropertyHolder;
use crate::model::{DocRef, Document, Value};

/// A not-yet-hydrated stand-in for a referenced entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyProxy {
    entity: String,
    source: Option<DocRef>,
    fields: Document,
    initialized: bool,
}

impl LazyProxy {
    /// Created by the reference-resolution machinery before identifier
    /// population runs. No fields are set yet.
    pub fn new(entity: impl Into<String>, source: Option<DocRef>) -> Self {
        Self {
            entity: entity.into(),
            source,
            fields: Document::new(),
            initialized: false,
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    /// The reference this proxy stands in for, if one was stored.
    pub fn source(&self) -> Option<&DocRef> {
        self.source.as_ref()
    }

    /// False until the first lazy load materializes the full document.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// Hand the proxy its full document. Fields from the document overwrite
    /// earlier writes of the same name; anything set before (the populated
    /// identifier) survives unless the document carries its own.
    pub fn materialize(&mut self, document: Document) {
        for (field, value) in document {
            self.fields.insert(field, value);
        }
        self.initialized = true;
    }
}

impl PropertyHolder for LazyProxy {
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn set_field(&mut self, field: &str, value: Value) {
        self.fields.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty_and_uninitialized() {
        let proxy = LazyProxy::new("Order", Some(DocRef::new("orders", 42i64)));
        assert_eq!(proxy.entity_name(), "Order");
        assert!(!proxy.is_initialized());
        assert!(proxy.fields().is_empty());
        assert_eq!(proxy.source().unwrap().collection(), "orders");
    }

    #[test]
    fn test_materialize_keeps_populated_id() {
        let mut proxy = LazyProxy::new("Order", None);
        proxy.set_field("_id", Value::Int64(42));

        proxy.materialize(Document::of("total", 9.5));

        assert!(proxy.is_initialized());
        assert_eq!(proxy.get_field("_id"), Some(&Value::Int64(42)));
        assert_eq!(proxy.get_field("total"), Some(&Value::Double(9.5)));
    }

    #[test]
    fn test_materialize_overwrites_same_field() {
        let mut proxy = LazyProxy::new("Order", None);
        proxy.set_field("_id", Value::Int64(42));

        proxy.materialize(Document::of("_id", 7i64));
        assert_eq!(proxy.get_field("_id"), Some(&Value::Int64(7)));
    }
}
