//! MappingContext — the shared registry of entity metadata.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::{Error, Result};
use super::entity::EntityDescriptor;
use super::property::PropertyDescriptor;

/// Registry of entity descriptors, shared by every conversion.
///
/// Descriptors are immutable once registered; the lock only guards the
/// registry map itself, so lookups stay cheap from any thread.
#[derive(Debug, Default)]
pub struct MappingContext {
    entities: RwLock<HashMap<String, Arc<EntityDescriptor>>>,
}

impl MappingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, returning the shared descriptor. Re-registering
    /// a name replaces the previous descriptor.
    pub fn register(&self, entity: EntityDescriptor) -> Arc<EntityDescriptor> {
        let entity = Arc::new(entity);
        debug!(entity = entity.name(), collection = entity.collection(), "registered entity mapping");
        self.entities
            .write()
            .insert(entity.name().to_owned(), Arc::clone(&entity));
        entity
    }

    pub fn entity(&self, name: &str) -> Option<Arc<EntityDescriptor>> {
        self.entities.read().get(name).cloned()
    }

    /// Lookup that treats a missing mapping as a configuration defect, not
    /// a recoverable condition.
    pub fn required_entity(&self, name: &str) -> Result<Arc<EntityDescriptor>> {
        self.entity(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_owned()))
    }

    /// The entity a reference property points at.
    pub fn required_entity_of(&self, property: &PropertyDescriptor) -> Result<Arc<EntityDescriptor>> {
        let target = property.target_entity().ok_or_else(|| {
            Error::UnknownEntity(format!("target of property '{}'", property.name()))
        })?;
        self.required_entity(target)
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}
