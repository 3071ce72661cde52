//! # Expression Evaluation
//!
//! A small expression language for computed property values: literals,
//! `#variables` from the evaluation context, and dotted property paths read
//! off the instance the evaluator is bound to.
//!
//! The evaluator exists so identifier-computing expressions can run against
//! an instance that is not fully loaded yet — unset fields read as `Null`
//! rather than failing.

mod eval;

use hashbrown::HashMap;

use crate::mapping::PropertyHolder;
use crate::model::Value;
use crate::Result;

/// Evaluation contract consumed by the value-resolution pipeline.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value>;
}

/// Immutable template of named `#variables`, fixed when the mapping layer is
/// wired up and shared by every evaluator built from it.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    vars: HashMap<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

/// Evaluator bound to one live instance.
///
/// Property paths in the expression read the instance's current state, so a
/// partially populated proxy can serve as the root object.
pub struct InstanceEvaluator<'a> {
    root: &'a dyn PropertyHolder,
    context: &'a EvaluationContext,
}

impl<'a> InstanceEvaluator<'a> {
    pub fn new(root: &'a dyn PropertyHolder, context: &'a EvaluationContext) -> Self {
        Self { root, context }
    }
}

impl ExpressionEvaluator for InstanceEvaluator<'_> {
    fn evaluate(&self, expression: &str) -> Result<Value> {
        let tokens = eval::tokenize(expression)?;
        eval::evaluate(&tokens, self.root, self.context)
    }
}
