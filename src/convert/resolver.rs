//! Value resolution contract.

use crate::expression::ExpressionEvaluator;
use crate::mapping::PropertyDescriptor;
use crate::model::{Document, Value};
use crate::Result;
use super::object_path::ObjectPath;

/// The contract between hydration / identifier population and the
/// conversion pipeline.
///
/// Given a property, a document carrying its raw value, an evaluator bound
/// to the instance under construction, and the resolution chain so far,
/// produce the typed value ready to assign. Implementations may recurse
/// through nested documents; the chain is how they notice they have come
/// back around.
pub trait ValueResolver: Send + Sync {
    fn resolve_value(
        &self,
        property: &PropertyDescriptor,
        document: &Document,
        evaluator: &dyn ExpressionEvaluator,
        path: &ObjectPath,
    ) -> Result<Value>;
}
