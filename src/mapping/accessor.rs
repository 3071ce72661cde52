//! Property access — the mutation contract between metadata and live
//! instances.

use crate::model::{Document, Value};
use crate::{Error, Result};
use super::entity::EntityDescriptor;
use super::property::PropertyDescriptor;

/// THE capability contract for anything the mapping layer mutates.
///
/// Proxies, hydrated entities and hand-written test stand-ins all expose
/// their persistent state by field name. Nothing here implies a concrete
/// object layout — a type only has to answer for its fields.
pub trait PropertyHolder {
    /// Read a field, if it currently holds a value.
    fn get_field(&self, field: &str) -> Option<&Value>;

    /// Write a field, creating it if absent.
    fn set_field(&mut self, field: &str, value: Value);
}

/// A plain document is a valid mutation target.
impl PropertyHolder for Document {
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }

    fn set_field(&mut self, field: &str, value: Value) {
        self.insert(field, value);
    }
}

/// An (entity metadata, live instance) pair that writes converted values
/// onto the instance under the entity's wire field names.
pub struct PropertyAccessor<'a> {
    entity: &'a EntityDescriptor,
    target: &'a mut dyn PropertyHolder,
}

impl<'a> PropertyAccessor<'a> {
    pub(crate) fn new(entity: &'a EntityDescriptor, target: &'a mut dyn PropertyHolder) -> Self {
        Self { entity, target }
    }

    /// Set `property` on the bound instance.
    ///
    /// The property must belong to the entity this accessor was built from.
    pub fn set(&mut self, property: &PropertyDescriptor, value: Value) -> Result<()> {
        if self.entity.property(property.name()).is_none() {
            return Err(Error::UnknownProperty {
                entity: self.entity.name().to_owned(),
                property: property.name().to_owned(),
            });
        }
        self.target.set_field(property.field_name(), value);
        Ok(())
    }

    /// Read `property` off the bound instance.
    pub fn get(&self, property: &PropertyDescriptor) -> Option<&Value> {
        self.target.get_field(property.field_name())
    }
}
