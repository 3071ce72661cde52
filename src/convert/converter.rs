//! DocumentConverter — the general-purpose recursive value resolver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::expression::ExpressionEvaluator;
use crate::mapping::{MappingContext, PropertyDescriptor, TypeHint};
use crate::model::{Document, ObjectId, Value};
use crate::{Error, Result};
use super::object_path::ObjectPath;
use super::resolver::ValueResolver;

/// Converts raw document fields into the typed values their property
/// metadata calls for.
///
/// One instance serves every entity registered in the shared mapping
/// context. Holds no per-call state; nested entity documents are resolved
/// recursively with the `ObjectPath` chain guarding against cycles.
#[derive(Clone)]
pub struct DocumentConverter {
    context: Arc<MappingContext>,
}

impl DocumentConverter {
    pub fn new(context: Arc<MappingContext>) -> Self {
        Self { context }
    }

    fn convert(&self, property: &PropertyDescriptor, raw: Value, path: &ObjectPath) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        if let Some(target) = property.target_entity() {
            if let Value::Document(doc) = raw {
                return self.convert_entity(target, &doc, property, path);
            }
        }
        convert_scalar(raw, property.type_hint())
    }

    /// Resolve a nested entity document, field by field.
    fn convert_entity(
        &self,
        target: &str,
        doc: &Document,
        via: &PropertyDescriptor,
        path: &ObjectPath,
    ) -> Result<Value> {
        let entity = self.context.required_entity(target)?;
        let raw_id = entity
            .id_property()
            .and_then(|p| doc.get(p.field_name()).cloned());

        if let Some(id) = &raw_id {
            if path.contains(entity.name(), id) {
                return Err(Error::CircularReference(format!(
                    "{path} -> {}({id})",
                    entity.name()
                )));
            }
        }

        let nested = path.push(&entity, raw_id, Some(via.name()));
        let mut out = Document::new();
        for property in entity.properties() {
            if let Some(value) = doc.get(property.field_name()) {
                out.insert(
                    property.field_name().to_owned(),
                    self.convert(property, value.clone(), &nested)?,
                );
            }
        }
        Ok(Value::Document(Box::new(out)))
    }
}

impl ValueResolver for DocumentConverter {
    fn resolve_value(
        &self,
        property: &PropertyDescriptor,
        document: &Document,
        evaluator: &dyn ExpressionEvaluator,
        path: &ObjectPath,
    ) -> Result<Value> {
        let raw = match property.expression() {
            Some(expression) => evaluator.evaluate(expression)?,
            None => document
                .get(property.field_name())
                .cloned()
                .unwrap_or(Value::Null),
        };
        trace!(property = property.name(), depth = path.len(), "resolving value");
        self.convert(property, raw, path)
    }
}

// ============================================================================
// Scalar coercions
// ============================================================================

/// Coercion table. Widening is silent; narrowing must be exact.
fn convert_scalar(raw: Value, hint: TypeHint) -> Result<Value> {
    let mismatch = |got: &Value| Error::TypeError {
        expected: hint.type_name().into(),
        got: got.type_name().into(),
    };

    Ok(match hint {
        TypeHint::Any => raw,

        TypeHint::Bool => match raw {
            Value::Bool(_) => raw,
            other => return Err(mismatch(&other)),
        },

        TypeHint::Int32 => match raw {
            Value::Int32(_) => raw,
            Value::Int64(v) => match i32::try_from(v) {
                Ok(narrowed) => Value::Int32(narrowed),
                Err(_) => return Err(mismatch(&Value::Int64(v))),
            },
            Value::Double(v)
                if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) =>
            {
                Value::Int32(v as i32)
            }
            other => return Err(mismatch(&other)),
        },

        TypeHint::Int64 => match raw {
            Value::Int32(v) => Value::Int64(v as i64),
            Value::Int64(_) => raw,
            Value::Double(v) if v.fract() == 0.0 => Value::Int64(v as i64),
            other => return Err(mismatch(&other)),
        },

        TypeHint::Double => match raw {
            Value::Int32(v) => Value::Double(v as f64),
            Value::Int64(v) => Value::Double(v as f64),
            Value::Double(_) => raw,
            other => return Err(mismatch(&other)),
        },

        TypeHint::String => match raw {
            Value::String(_) => raw,
            Value::ObjectId(oid) => Value::String(oid.to_hex()),
            other => return Err(mismatch(&other)),
        },

        TypeHint::ObjectId => match raw {
            Value::ObjectId(_) => raw,
            Value::String(s) => Value::ObjectId(ObjectId::parse_str(&s)?),
            other => return Err(mismatch(&other)),
        },

        TypeHint::DateTime => match raw {
            Value::DateTime(_) => raw,
            Value::Int64(ms) => match DateTime::<Utc>::from_timestamp_millis(ms) {
                Some(dt) => Value::DateTime(dt),
                None => return Err(mismatch(&Value::Int64(ms))),
            },
            Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => Value::DateTime(dt.with_timezone(&Utc)),
                Err(_) => return Err(mismatch(&Value::String(s))),
            },
            other => return Err(mismatch(&other)),
        },

        TypeHint::Bytes => match raw {
            Value::Bytes(_) => raw,
            other => return Err(mismatch(&other)),
        },

        TypeHint::Array => match raw {
            Value::Array(_) => raw,
            other => return Err(mismatch(&other)),
        },

        TypeHint::Document => match raw {
            Value::Document(_) => raw,
            other => return Err(mismatch(&other)),
        },
    })
}
