//! `@for (item of array) ... @endfor`

use std::sync::LazyLock;

use log::error;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::eval::value::to_display;
use crate::eval::{evaluate_or_empty, Context, Evaluator};

/// Non-greedy: a nested `@for` closes at the nearest `@endfor`
static LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@for\s*\((\w+)\s+of\s+(\w+)\)(.*?)@endfor").expect("loop pattern")
});

/// Any `{{...}}` inside a loop body; the content is a full expression
static BODY_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("body expression pattern"));

/// Expand every loop block against `data`
///
/// Each element gets a copy of the body whose `{{expression}}`s are
/// evaluated with the element bound to the item name on top of `data`.
/// A source that is not an array logs an error and expands to nothing.
pub fn expand_loops<E: Evaluator + ?Sized>(text: &str, data: &Context, evaluator: &E) -> String {
    LOOP.replace_all(text, |caps: &Captures| {
        let item = &caps[1];
        let source = &caps[2];
        let body = &caps[3];

        let Some(Value::Array(elements)) = data.get(source) else {
            error!(
                "Array {} is not defined or is not an array in data context.",
                source
            );
            return String::new();
        };

        let mut scope = data.clone();
        elements
            .iter()
            .map(|element| {
                scope.insert(item.to_string(), element.clone());
                BODY_EXPRESSION
                    .replace_all(body, |inner: &Captures| {
                        to_display(&evaluate_or_empty(evaluator, &inner[1], &scope))
                    })
                    .into_owned()
            })
            .collect::<String>()
    })
    .into_owned()
}
