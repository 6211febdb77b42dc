//! Value coercions shared by the evaluator and the expander
//!
//! Data contexts are plain `serde_json` values. These helpers give them the
//! loose scripting-language semantics templates expect: truthiness, string
//! conversion for output, numeric coercion for arithmetic.

use serde_json::{Number, Value};

/// Wrap an `f64` as a JSON value, using an integer representation when exact
///
/// Non-finite results have no JSON representation and become null.
pub fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Truthiness of a value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert a value to the text written into markup
///
/// Null renders as empty text. Arrays join their elements with commas;
/// objects render as compact JSON.
pub fn to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_display).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Numeric coercion used by arithmetic and relational operators
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Strict equality: same type and same value, numbers compared numerically
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Loose equality: numbers, booleans and numeric strings compare by value
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            a == b
        }
        _ => to_number(a) == to_number(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(-1.5)));
    }

    #[test]
    fn test_display() {
        assert_eq!(to_display(&json!(null)), "");
        assert_eq!(to_display(&json!(3)), "3");
        assert_eq!(to_display(&json!(2.5)), "2.5");
        assert_eq!(to_display(&json!(4.0)), "4");
        assert_eq!(to_display(&json!(["a", 1, true])), "a,1,true");
        assert_eq!(to_display(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_number_prefers_integers() {
        assert_eq!(number(3.0), json!(3));
        assert_eq!(number(0.5), json!(0.5));
        assert_eq!(number(f64::NAN), json!(null));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_equals(&json!("1"), &json!(1)));
        assert!(loose_equals(&json!(true), &json!(1)));
        assert!(!loose_equals(&json!(null), &json!(0)));
        assert!(!loose_equals(&json!("a"), &json!("b")));
    }

    #[test]
    fn test_strict_equality() {
        assert!(strict_equals(&json!(1), &json!(1.0)));
        assert!(!strict_equals(&json!("1"), &json!(1)));
    }
}
