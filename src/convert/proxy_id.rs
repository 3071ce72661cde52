//! Identifier population for lazy reference proxies.

use std::sync::Arc;

use crate::expression::{EvaluationContext, InstanceEvaluator};
use crate::mapping::{MappingContext, PropertyDescriptor, PropertyHolder};
use crate::model::{DocRef, Document};
use crate::Result;
use super::object_path::ObjectPath;
use super::resolver::ValueResolver;

/// Populates the identifier field of a freshly created reference proxy, so
/// identity operations (equality, hashing, logging) work before the first
/// lazy load fetches the real document.
///
/// Holds no mutable state; the collaborators are fixed at construction and
/// shared immutably, so concurrent calls on distinct proxies are safe.
pub struct ProxyIdPopulator {
    context: Arc<MappingContext>,
    eval_context: EvaluationContext,
    resolver: Arc<dyn ValueResolver>,
}

impl ProxyIdPopulator {
    pub fn new(
        context: Arc<MappingContext>,
        eval_context: EvaluationContext,
        resolver: Arc<dyn ValueResolver>,
    ) -> Self {
        Self { context, eval_context, resolver }
    }

    /// Set the identifier of `proxy` from `source`, converting the raw
    /// reference id through the same pipeline full hydration uses.
    ///
    /// No-ops when there is no reference to take the id from, or when the
    /// identifier is written through accessor methods — a speculative
    /// accessor call on a not-yet-loaded instance is not safe, a direct
    /// field write is. Failures from the mapping context or the resolver
    /// propagate unmodified.
    pub fn populate_id(
        &self,
        property: &PropertyDescriptor,
        source: Option<&DocRef>,
        proxy: &mut dyn PropertyHolder,
    ) -> Result<()> {
        let Some(source) = source else {
            return Ok(());
        };

        let entity = self.context.required_entity_of(property)?;
        let id_property = entity.required_id_property()?;

        if id_property.use_accessor() {
            return Ok(());
        }

        let document = Document::of(id_property.field_name(), source.id().clone());

        // Rooted fresh: identifier population is its own top-level
        // resolution, never nested under whatever chain triggered the
        // reference access.
        let path = ObjectPath::root().push(&entity, Some(source.id().clone()), None);

        let value = {
            let evaluator = InstanceEvaluator::new(&*proxy, &self.eval_context);
            self.resolver
                .resolve_value(id_property, &document, &evaluator, &path)?
        };

        entity.property_accessor(proxy).set(id_property, value)
    }
}
