//! # docmap-rs — Document Mapping Core
//!
//! Entity metadata, typed value conversion, and identifier population for
//! lazily resolved document references.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `PropertyHolder` and `ValueResolver` are the
//!    contracts between metadata, conversion, and live instances
//! 2. **Clean DTOs**: `Value`, `Document`, `DocRef` cross all boundaries
//! 3. **Metadata owns nothing mutable**: descriptors are built once and
//!    shared immutably
//! 4. **One conversion pipeline**: identifier-only resolution and full
//!    hydration run through the same resolver, so they fail the same way
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use docmap_rs::{
//!     DocRef, EntityDescriptor, LazyProxy, Mapper, MappingContext,
//!     PropertyDescriptor, PropertyHolder, TypeHint, Value,
//! };
//!
//! # fn main() -> docmap_rs::Result<()> {
//! let context = Arc::new(MappingContext::new());
//! context.register(
//!     EntityDescriptor::new("Order")
//!         .with_collection("orders")
//!         .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64)),
//! );
//!
//! let mapper = Mapper::new(context);
//! let populator = mapper.id_populator();
//!
//! // A stored reference, and the freshly created proxy standing in for
//! // the document it points at.
//! let source = DocRef::new("orders", 42i64);
//! let mut proxy = LazyProxy::new("Order", Some(source.clone()));
//!
//! let order_ref = PropertyDescriptor::new("order").with_target_entity("Order");
//! populator.populate_id(&order_ref, Some(&source), &mut proxy)?;
//!
//! assert_eq!(proxy.get_field("_id"), Some(&Value::Int64(42)));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod mapping;
pub mod expression;
pub mod convert;
pub mod proxy;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Value, Document, ObjectId, DocRef};

// ============================================================================
// Re-exports: Mapping metadata
// ============================================================================

pub use mapping::{
    AccessStrategy, EntityDescriptor, MappingContext,
    PropertyAccessor, PropertyDescriptor, PropertyHolder, TypeHint,
};

// ============================================================================
// Re-exports: Expression evaluation
// ============================================================================

pub use expression::{EvaluationContext, ExpressionEvaluator, InstanceEvaluator};

// ============================================================================
// Re-exports: Conversion
// ============================================================================

pub use convert::{DocumentConverter, ObjectPath, ProxyIdPopulator, ValueResolver};

// ============================================================================
// Re-exports: Proxies
// ============================================================================

pub use proxy::LazyProxy;

use std::sync::Arc;

// ============================================================================
// Top-level Mapper handle
// ============================================================================

/// The primary entry point. A `Mapper` wraps a mapping context and wires up
/// the conversion pipeline.
pub struct Mapper {
    context: Arc<MappingContext>,
    eval_context: EvaluationContext,
}

impl Mapper {
    /// Create a Mapper over the given metadata registry.
    pub fn new(context: Arc<MappingContext>) -> Self {
        Self { context, eval_context: EvaluationContext::new() }
    }

    /// Replace the expression variable template shared by every evaluator
    /// this mapper builds.
    pub fn with_eval_context(mut self, eval_context: EvaluationContext) -> Self {
        self.eval_context = eval_context;
        self
    }

    /// Access the underlying metadata registry.
    pub fn context(&self) -> &Arc<MappingContext> {
        &self.context
    }

    /// The general-purpose value resolver.
    pub fn converter(&self) -> DocumentConverter {
        DocumentConverter::new(Arc::clone(&self.context))
    }

    /// Identifier populator for lazy reference proxies, riding on the
    /// converter.
    pub fn id_populator(&self) -> ProxyIdPopulator {
        ProxyIdPopulator::new(
            Arc::clone(&self.context),
            self.eval_context.clone(),
            Arc::new(self.converter()),
        )
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration defect: a type was used as a persistent entity without
    /// a registered mapping. Fail-fast, never recoverable at runtime.
    #[error("No entity mapping registered for '{0}'")]
    UnknownEntity(String),

    /// Configuration defect: the entity declares no identifier property.
    #[error("Entity '{0}' declares no identifier property")]
    MissingIdProperty(String),

    /// Configuration defect: a property was used against an entity it does
    /// not belong to.
    #[error("Unknown property '{property}' on entity '{entity}'")]
    UnknownProperty { entity: String, property: String },

    /// A raw value cannot be converted to the property's declared type.
    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    /// A computed-value expression failed to tokenize or evaluate.
    #[error("Expression error at position {position}: {message}")]
    ExpressionError { position: usize, message: String },

    /// Resolution came back around to an object already on the chain.
    #[error("Circular reference: {0}")]
    CircularReference(String),
}

pub type Result<T> = std::result::Result<T, Error>;
