//! Expression evaluation against a named-variable context
//!
//! The expander never interprets expression text itself; it hands it to an
//! [`Evaluator`]. [`ExpressionEvaluator`] is the bundled implementation: a
//! restricted grammar with member access, comparisons, boolean and
//! arithmetic operators, and ternaries. It cannot call functions or mutate
//! anything, so template text never runs arbitrary code.

pub mod ast;
mod grammar;
mod interpreter;
pub mod lexer;
pub mod value;

pub use grammar::parse;
pub use interpreter::interpret;

use log::error;
use serde_json::{Map, Value};

use crate::error::EvalError;

/// Variables visible to an expression, by name
pub type Context = Map<String, Value>;

/// Pluggable expression evaluation
pub trait Evaluator {
    /// Evaluate `expression` with every key of `context` in scope
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, EvalError>;
}

/// The bundled evaluator: parse with [`parse`], run with [`interpret`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, EvalError> {
        let expr = parse(expression.trim()).map_err(|errors| {
            errors.into_iter().next().unwrap_or(EvalError::Type {
                message: "empty expression".to_string(),
            })
        })?;
        interpret(&expr, context)
    }
}

/// Evaluate without a failure branch
///
/// Any failure is logged together with the offending expression and yields
/// an empty string, so one broken directive never aborts a render.
pub fn evaluate_or_empty<E: Evaluator + ?Sized>(
    evaluator: &E,
    expression: &str,
    context: &Context,
) -> Value {
    match evaluator.evaluate(expression, context) {
        Ok(value) => value,
        Err(e) => {
            error!(
                "Error evaluating expression `{}`: {}",
                expression,
                e.format(expression.trim(), "expression")
            );
            Value::String(String::new())
        }
    }
}
