//! Entity metadata — a persistent type and its properties.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{Error, Result};
use super::accessor::{PropertyAccessor, PropertyHolder};
use super::property::PropertyDescriptor;

/// Metadata for one persistent entity type.
///
/// Built once with the `with_*` methods, then registered in a
/// `MappingContext` and shared immutably behind an `Arc` for the lifetime of
/// the mapping layer.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    name: String,
    collection: String,
    properties: SmallVec<[PropertyDescriptor; 8]>,
    by_name: HashMap<String, usize>,
    id_index: Option<usize>,
}

impl EntityDescriptor {
    /// New entity. The collection defaults to the lowercased type name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let collection = name.to_lowercase();
        Self {
            name,
            collection,
            properties: SmallVec::new(),
            by_name: HashMap::new(),
            id_index: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Add a property. The first property flagged as identifier becomes the
    /// entity's id property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        let index = self.properties.len();
        self.by_name.insert(property.name().to_owned(), index);
        if property.is_id() && self.id_index.is_none() {
            self.id_index = Some(index);
        }
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    pub fn required_property(&self, name: &str) -> Result<&PropertyDescriptor> {
        self.property(name).ok_or_else(|| Error::UnknownProperty {
            entity: self.name.clone(),
            property: name.to_owned(),
        })
    }

    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.id_index.map(|i| &self.properties[i])
    }

    /// Identifier lookup that treats absence as a structural mapping defect.
    pub fn required_id_property(&self) -> Result<&PropertyDescriptor> {
        self.id_property()
            .ok_or_else(|| Error::MissingIdProperty(self.name.clone()))
    }

    /// Accessor bound to one live instance.
    pub fn property_accessor<'a>(
        &'a self,
        target: &'a mut dyn PropertyHolder,
    ) -> PropertyAccessor<'a> {
        PropertyAccessor::new(self, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TypeHint;

    fn order() -> EntityDescriptor {
        EntityDescriptor::new("Order")
            .with_collection("orders")
            .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64))
            .with_property(PropertyDescriptor::new("total").with_type(TypeHint::Double))
    }

    #[test]
    fn test_lookup() {
        let entity = order();
        assert_eq!(entity.collection(), "orders");
        assert!(entity.property("total").is_some());
        assert!(entity.property("missing").is_none());
        assert!(matches!(
            entity.required_property("missing"),
            Err(Error::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_id_property() {
        let entity = order();
        assert_eq!(entity.required_id_property().unwrap().name(), "id");

        let bare = EntityDescriptor::new("Audit");
        assert!(bare.id_property().is_none());
        assert!(matches!(
            bare.required_id_property(),
            Err(Error::MissingIdProperty(name)) if name == "Audit"
        ));
    }

    #[test]
    fn test_default_collection() {
        assert_eq!(EntityDescriptor::new("Customer").collection(), "customer");
    }
}
