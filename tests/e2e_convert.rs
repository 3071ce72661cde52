//! End-to-end tests for the document conversion pipeline.
//!
//! Each test drives `DocumentConverter` through its `ValueResolver` contract
//! with a real evaluator and resolution chain, the same way identifier
//! population and hydration do.

use std::sync::Arc;

use docmap_rs::{
    Document, EntityDescriptor, Error, EvaluationContext, InstanceEvaluator, Mapper,
    MappingContext, ObjectPath, PropertyDescriptor, TypeHint, Value, ValueResolver,
};

// ============================================================================
// Test fixtures
// ============================================================================

fn shop_context() -> Arc<MappingContext> {
    let context = Arc::new(MappingContext::new());
    context.register(
        EntityDescriptor::new("Customer")
            .with_collection("customers")
            .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64))
            .with_property(PropertyDescriptor::new("name").with_type(TypeHint::String)),
    );
    context.register(
        EntityDescriptor::new("Order")
            .with_collection("orders")
            .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64))
            .with_property(PropertyDescriptor::new("total").with_type(TypeHint::Double))
            .with_property(PropertyDescriptor::new("customer").with_target_entity("Customer")),
    );
    context
}

fn resolve(
    context: &Arc<MappingContext>,
    property: &PropertyDescriptor,
    document: &Document,
) -> docmap_rs::Result<Value> {
    let converter = Mapper::new(Arc::clone(context)).converter();
    let root = Document::new();
    let eval_context = EvaluationContext::new();
    let evaluator = InstanceEvaluator::new(&root, &eval_context);
    converter.resolve_value(property, document, &evaluator, &ObjectPath::root())
}

// ============================================================================
// 1. Plain field resolution with scalar coercion
// ============================================================================

#[test]
fn test_resolves_field_with_coercion() {
    let context = shop_context();
    let property = PropertyDescriptor::new("total").with_type(TypeHint::Double);

    let document = Document::of("total", 9i32);
    let value = resolve(&context, &property, &document).unwrap();
    assert_eq!(value, Value::Double(9.0));
}

#[test]
fn test_missing_field_resolves_to_null() {
    let context = shop_context();
    let property = PropertyDescriptor::new("total").with_type(TypeHint::Double);

    let value = resolve(&context, &property, &Document::new()).unwrap();
    assert_eq!(value, Value::Null);
}

// ============================================================================
// 2. Nested entity documents convert field by field
// ============================================================================

#[test]
fn test_nested_entity_document_conversion() {
    let context = shop_context();
    let property = PropertyDescriptor::new("customer").with_target_entity("Customer");

    let mut nested = Document::new();
    nested.insert("_id", 7i32); // narrow on the wire, Int64 in the mapping
    nested.insert("name", "Ada");
    let document = Document::of("customer", nested);

    let value = resolve(&context, &property, &document).unwrap();
    let converted = value.as_document().unwrap();
    assert_eq!(converted.get("_id"), Some(&Value::Int64(7)));
    assert_eq!(converted.get("name"), Some(&Value::String("Ada".into())));
}

#[test]
fn test_unregistered_nested_entity_fails() {
    let context = shop_context();
    let property = PropertyDescriptor::new("supplier").with_target_entity("Supplier");

    let document = Document::of("supplier", Document::of("_id", 1i64));
    let result = resolve(&context, &property, &document);
    assert!(matches!(result, Err(Error::UnknownEntity(name)) if name == "Supplier"));
}

// ============================================================================
// 3. Cycles are detected through the resolution chain
// ============================================================================

#[test]
fn test_circular_reference_detected() {
    let context = Arc::new(MappingContext::new());
    context.register(
        EntityDescriptor::new("Node")
            .with_collection("nodes")
            .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64))
            .with_property(PropertyDescriptor::new("next").with_target_entity("Node")),
    );

    let mut inner = Document::new();
    inner.insert("_id", 1i64); // same identity as the outer node
    let mut outer = Document::new();
    outer.insert("_id", 1i64);
    outer.insert("next", inner);

    let property = PropertyDescriptor::new("root").with_target_entity("Node");
    let document = Document::of("root", outer);

    let result = resolve(&context, &property, &document);
    assert!(matches!(result, Err(Error::CircularReference(_))));
}

#[test]
fn test_distinct_nested_identities_are_not_a_cycle() {
    let context = Arc::new(MappingContext::new());
    context.register(
        EntityDescriptor::new("Node")
            .with_collection("nodes")
            .with_property(PropertyDescriptor::id("id").with_type(TypeHint::Int64))
            .with_property(PropertyDescriptor::new("next").with_target_entity("Node")),
    );

    let mut inner = Document::new();
    inner.insert("_id", 2i64);
    let mut outer = Document::new();
    outer.insert("_id", 1i64);
    outer.insert("next", inner);

    let property = PropertyDescriptor::new("root").with_target_entity("Node");
    let document = Document::of("root", outer);

    let value = resolve(&context, &property, &document).unwrap();
    let converted = value.as_document().unwrap();
    let next = converted.get("next").unwrap().as_document().unwrap();
    assert_eq!(next.get("_id"), Some(&Value::Int64(2)));
}

// ============================================================================
// 4. Expressions short-circuit the stored field
// ============================================================================

#[test]
fn test_expression_short_circuits_field_lookup() {
    let context = shop_context();
    let property = PropertyDescriptor::new("label")
        .with_type(TypeHint::String)
        .with_expression("#env + '-order'");

    let converter = Mapper::new(Arc::clone(&context)).converter();
    let root = Document::new();
    let eval_context = EvaluationContext::new().with_var("env", "prod");
    let evaluator = InstanceEvaluator::new(&root, &eval_context);

    // The stored field would say otherwise; the expression wins.
    let document = Document::of("label", "stored");
    let value = converter
        .resolve_value(&property, &document, &evaluator, &ObjectPath::root())
        .unwrap();
    assert_eq!(value, Value::String("prod-order".into()));
}

#[test]
fn test_expression_failure_propagates() {
    let context = shop_context();
    let property = PropertyDescriptor::new("label")
        .with_type(TypeHint::String)
        .with_expression("#unbound");

    let result = resolve(&context, &property, &Document::new());
    assert!(matches!(result, Err(Error::ExpressionError { .. })));
}
