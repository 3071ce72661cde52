//! Property metadata — one persistent field of an entity.

use serde::{Deserialize, Serialize};

/// How a property is read and written on a live instance.
///
/// Field access writes straight into backing state and is safe on a
/// partially constructed object. Accessor access goes through user-defined
/// methods that may assume a fully hydrated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessStrategy {
    Field,
    Accessor,
}

/// Conversion target of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeHint {
    /// No conversion — the raw value passes through unchanged.
    Any,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Bytes,
    ObjectId,
    DateTime,
    Array,
    Document,
}

impl TypeHint {
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeHint::Any => "ANY",
            TypeHint::Bool => "BOOLEAN",
            TypeHint::Int32 => "INT32",
            TypeHint::Int64 => "INT64",
            TypeHint::Double => "DOUBLE",
            TypeHint::String => "STRING",
            TypeHint::Bytes => "BYTES",
            TypeHint::ObjectId => "OBJECT_ID",
            TypeHint::DateTime => "DATE_TIME",
            TypeHint::Array => "ARRAY",
            TypeHint::Document => "DOCUMENT",
        }
    }
}

/// Metadata for one persistent property.
///
/// Immutable once its entity descriptor is built. The wire field name
/// defaults to the property name; identifier properties default to `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    name: String,
    field_name: String,
    type_hint: TypeHint,
    access: AccessStrategy,
    is_id: bool,
    expression: Option<String>,
    target_entity: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            field_name: name.clone(),
            name,
            type_hint: TypeHint::Any,
            access: AccessStrategy::Field,
            is_id: false,
            expression: None,
            target_entity: None,
        }
    }

    /// An identifier property. Maps to the `_id` field unless overridden.
    pub fn id(name: impl Into<String>) -> Self {
        let mut property = Self::new(name);
        property.field_name = "_id".into();
        property.is_id = true;
        property
    }

    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_type(mut self, hint: TypeHint) -> Self {
        self.type_hint = hint;
        self
    }

    pub fn with_access(mut self, access: AccessStrategy) -> Self {
        self.access = access;
        self
    }

    /// Compute this property's value from an expression instead of a stored
    /// field. Evaluated against the instance under construction.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Declare the entity type this property points at (reference
    /// properties).
    pub fn with_target_entity(mut self, entity: impl Into<String>) -> Self {
        self.target_entity = Some(entity.into());
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn field_name(&self) -> &str { &self.field_name }
    pub fn type_hint(&self) -> TypeHint { self.type_hint }
    pub fn access(&self) -> AccessStrategy { self.access }
    pub fn is_id(&self) -> bool { self.is_id }
    pub fn expression(&self) -> Option<&str> { self.expression.as_deref() }
    pub fn target_entity(&self) -> Option<&str> { self.target_entity.as_deref() }

    /// True when writes must go through accessor methods rather than the
    /// backing field.
    pub fn use_accessor(&self) -> bool {
        self.access == AccessStrategy::Accessor
    }
}
