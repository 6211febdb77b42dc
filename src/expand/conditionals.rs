//! `@if (cond) ... @else ... @endif` and `@if (cond) ... @endif`

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::eval::value::is_truthy;
use crate::eval::{evaluate_or_empty, Context, Evaluator};

static IF_ELSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@if\s*\(([^)]+)\)(.*?)@else(.*?)@endif").expect("if/else pattern")
});

static IF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)@if\s*\(([^)]+)\)(.*?)@endif").expect("if pattern"));

/// Resolve conditionals: blocks with `@else` first, then plain ones
///
/// Conditions see `data` only. Loop items are not in scope even for an
/// `@if` that sat inside a loop body, because loops have already been
/// expanded by the time this pass runs.
pub fn expand_conditionals<E: Evaluator + ?Sized>(
    text: &str,
    data: &Context,
    evaluator: &E,
) -> String {
    let with_else = IF_ELSE.replace_all(text, |caps: &Captures| {
        if is_truthy(&evaluate_or_empty(evaluator, &caps[1], data)) {
            caps[2].to_string()
        } else {
            caps[3].to_string()
        }
    });

    IF.replace_all(&with_else, |caps: &Captures| {
        if is_truthy(&evaluate_or_empty(evaluator, &caps[1], data)) {
            caps[2].to_string()
        } else {
            String::new()
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ExpressionEvaluator;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn expand(text: &str, data: Value) -> String {
        let data = data.as_object().cloned().unwrap_or_default();
        expand_conditionals(text, &data, &ExpressionEvaluator)
    }

    #[test]
    fn test_literal_conditions() {
        assert_eq!(expand("@if (true)A@else B@endif", json!({})), "A");
        assert_eq!(expand("@if (false)A@else B@endif", json!({})), " B");
        assert_eq!(expand("@if (false)A@endif", json!({})), "");
        assert_eq!(expand("@if (true)A@endif", json!({})), "A");
    }

    #[test]
    fn test_condition_against_data() {
        let template = "@if (user.admin)<b>admin</b>@else<i>guest</i>@endif";
        assert_eq!(expand(template, json!({"user": {"admin": true}})), "<b>admin</b>");
        assert_eq!(expand(template, json!({"user": {"admin": false}})), "<i>guest</i>");
    }

    #[test]
    fn test_comparison_condition() {
        assert_eq!(
            expand("@if (count > 0)<span>{{count}}</span>@endif", json!({"count": 2})),
            "<span>{{count}}</span>"
        );
    }

    #[test]
    fn test_failed_condition_is_falsy() {
        assert_eq!(expand("@if (missing)A@else B@endif", json!({})), " B");
    }

    #[test]
    fn test_multiline_blocks() {
        assert_eq!(
            expand("@if (ok)\n  <p>yes</p>\n@else\n  <p>no</p>\n@endif", json!({"ok": 0})),
            "\n  <p>no</p>\n"
        );
    }

    #[test]
    fn test_sequential_conditionals() {
        assert_eq!(
            expand("@if (a)1@endif@if (b)2@endif", json!({"a": true, "b": true})),
            "12"
        );
    }
}
