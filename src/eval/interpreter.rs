//! Tree-walking interpreter for parsed expressions

use serde_json::Value;

use crate::error::EvalError;
use crate::eval::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use crate::eval::value::{is_truthy, loose_equals, number, strict_equals, to_display, to_number};
use crate::eval::Context;

/// Evaluate an expression tree with every context key in scope by name
pub fn interpret(expr: &Expr, context: &Context) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => context
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() }),
        Expr::Member { object, name } => {
            let object = interpret(object, context)?;
            member(&object, name)
        }
        Expr::Index { object, index } => {
            let object = interpret(object, context)?;
            let index = interpret(index, context)?;
            match &index {
                Value::String(name) => member(&object, name),
                _ => member(&object, &to_display(&index)),
            }
        }
        Expr::Unary { op, operand } => {
            let value = interpret(operand, context)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!is_truthy(&value)),
                UnaryOp::Negate => number(-to_number(&value)),
            })
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, context),
        Expr::Logical { op, lhs, rhs } => logical(*op, lhs, rhs, context),
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if is_truthy(&interpret(condition, context)?) {
                interpret(then, context)
            } else {
                interpret(otherwise, context)
            }
        }
    }
}

/// Property lookup; absent properties are null, property access on null fails
fn member(object: &Value, name: &str) -> Result<Value, EvalError> {
    match object {
        Value::Null => Err(EvalError::Type {
            message: format!("cannot read property '{}' of null", name),
        }),
        Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        Value::Array(items) => {
            if name == "length" {
                return Ok(Value::from(items.len()));
            }
            Ok(name
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(Value::Null))
        }
        Value::String(s) => {
            if name == "length" {
                return Ok(Value::from(s.chars().count()));
            }
            Ok(name
                .parse::<usize>()
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::String(c.to_string()))
                .unwrap_or(Value::Null))
        }
        Value::Bool(_) | Value::Number(_) => Ok(Value::Null),
    }
}

/// `&&` and `||` evaluate the right side only when needed
fn logical(op: LogicalOp, lhs: &Expr, rhs: &Expr, context: &Context) -> Result<Value, EvalError> {
    let left = interpret(lhs, context)?;
    match (op, is_truthy(&left)) {
        (LogicalOp::And, true) | (LogicalOp::Or, false) => interpret(rhs, context),
        (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
    }
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, context: &Context) -> Result<Value, EvalError> {
    let left = interpret(lhs, context)?;
    let right = interpret(rhs, context)?;

    Ok(match op {
        BinaryOp::Add => add(&left, &right),
        BinaryOp::Subtract => number(to_number(&left) - to_number(&right)),
        BinaryOp::Multiply => number(to_number(&left) * to_number(&right)),
        BinaryOp::Divide => number(to_number(&left) / to_number(&right)),
        BinaryOp::Remainder => number(to_number(&left) % to_number(&right)),
        BinaryOp::Less => Value::Bool(compare(&left, &right, |o| o.is_lt())),
        BinaryOp::LessOrEqual => Value::Bool(compare(&left, &right, |o| o.is_le())),
        BinaryOp::Greater => Value::Bool(compare(&left, &right, |o| o.is_gt())),
        BinaryOp::GreaterOrEqual => Value::Bool(compare(&left, &right, |o| o.is_ge())),
        BinaryOp::Equal => Value::Bool(loose_equals(&left, &right)),
        BinaryOp::NotEqual => Value::Bool(!loose_equals(&left, &right)),
        BinaryOp::StrictEqual => Value::Bool(strict_equals(&left, &right)),
        BinaryOp::StrictNotEqual => Value::Bool(!strict_equals(&left, &right)),
    })
}

/// `+` concatenates as soon as either side is text
fn add(left: &Value, right: &Value) -> Value {
    if left.is_string() || right.is_string() {
        return Value::String(format!("{}{}", to_display(left), to_display(right)));
    }
    number(to_number(left) + to_number(right))
}

/// Strings compare lexically with each other, everything else numerically
fn compare(left: &Value, right: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return test(a.cmp(b));
    }
    to_number(left)
        .partial_cmp(&to_number(right))
        .map(test)
        .unwrap_or(false)
}
