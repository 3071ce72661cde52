//! ObjectPath — the resolution-ancestry chain.

use std::fmt;
use std::sync::Arc;

use crate::mapping::EntityDescriptor;
use crate::model::Value;

#[derive(Debug)]
struct Frame {
    parent: Option<Arc<Frame>>,
    entity: Arc<EntityDescriptor>,
    id: Option<Value>,
    field: Option<String>,
}

/// Immutable, structurally shared chain of in-progress resolutions.
///
/// `push` returns a new path whose frame references its parent, so a
/// recursive resolver can fan out into siblings without copying or
/// synchronizing. Frames record (entity, raw identifier, owning field);
/// a repeat of the same (entity, id) pair deeper in the chain marks a
/// cycle.
#[derive(Debug, Clone, Default)]
pub struct ObjectPath {
    head: Option<Arc<Frame>>,
}

impl ObjectPath {
    /// The empty chain every top-level resolution starts from.
    pub fn root() -> Self {
        Self { head: None }
    }

    /// Append one frame. The receiver is unchanged; siblings pushed from
    /// the same parent share its tail.
    pub fn push(
        &self,
        entity: &Arc<EntityDescriptor>,
        id: Option<Value>,
        field: Option<&str>,
    ) -> Self {
        Self {
            head: Some(Arc::new(Frame {
                parent: self.head.clone(),
                entity: Arc::clone(entity),
                id,
                field: field.map(str::to_owned),
            })),
        }
    }

    pub fn len(&self) -> usize {
        let mut n = 0;
        let mut cur = self.head.as_deref();
        while let Some(frame) = cur {
            n += 1;
            cur = frame.parent.as_deref();
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// True if (entity, id) already occurs anywhere up the chain.
    pub fn contains(&self, entity: &str, id: &Value) -> bool {
        let mut cur = self.head.as_deref();
        while let Some(frame) = cur {
            if frame.entity.name() == entity && frame.id.as_ref() == Some(id) {
                return true;
            }
            cur = frame.parent.as_deref();
        }
        false
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<root>");
        }
        let mut frames = Vec::new();
        let mut cur = self.head.as_deref();
        while let Some(frame) = cur {
            frames.push(frame);
            cur = frame.parent.as_deref();
        }
        for (i, frame) in frames.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            match (&frame.field, &frame.id) {
                (Some(field), Some(id)) => write!(f, "{}.{field}({id})", frame.entity.name())?,
                (Some(field), None) => write!(f, "{}.{field}", frame.entity.name())?,
                (None, Some(id)) => write!(f, "{}({id})", frame.entity.name())?,
                (None, None) => write!(f, "{}", frame.entity.name())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::EntityDescriptor;

    fn entity(name: &str) -> Arc<EntityDescriptor> {
        Arc::new(EntityDescriptor::new(name))
    }

    #[test]
    fn test_push_is_persistent() {
        let order = entity("Order");
        let customer = entity("Customer");

        let root = ObjectPath::root();
        let a = root.push(&order, Some(Value::Int64(1)), None);
        let b = a.push(&customer, Some(Value::Int64(2)), Some("customer"));

        // Pushing never mutates the receiver.
        assert_eq!(root.len(), 0);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);

        // Siblings share the parent chain.
        let c = a.push(&customer, Some(Value::Int64(3)), Some("customer"));
        assert!(c.contains("Order", &Value::Int64(1)));
        assert!(!c.contains("Customer", &Value::Int64(2)));
    }

    #[test]
    fn test_contains() {
        let order = entity("Order");
        let path = ObjectPath::root().push(&order, Some(Value::Int64(42)), None);

        assert!(path.contains("Order", &Value::Int64(42)));
        assert!(!path.contains("Order", &Value::Int64(7)));
        assert!(!path.contains("Customer", &Value::Int64(42)));
    }

    #[test]
    fn test_display() {
        let order = entity("Order");
        let customer = entity("Customer");
        let path = ObjectPath::root()
            .push(&order, Some(Value::Int64(1)), None)
            .push(&customer, None, Some("customer"));

        assert_eq!(ObjectPath::root().to_string(), "<root>");
        assert_eq!(path.to_string(), "Order(1) -> Customer.customer");
    }
}
