//! Top-level `{{dot.path}}` substitution

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::eval::value::to_display;
use crate::eval::Context;

/// Dot paths only; `{{ a + b }}` outside a loop stays as written
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+(?:\.\w+)*)\}\}").expect("placeholder pattern"));

/// Replace every `{{dot.path}}` with its value from `data`
pub fn interpolate(text: &str, data: &Context) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            resolve_path(data, &caps[1])
                .map(|value| to_display(&value))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Walk `path` segment by segment; `None` as soon as a step is missing
///
/// Arrays are indexed by numeric segments (`items.0.name`). Arrays and
/// strings also answer `length`.
pub fn resolve_path<'a>(data: &'a Context, path: &str) -> Option<Cow<'a, Value>> {
    let mut segments = path.split('.');
    let mut value = data.get(segments.next()?)?;
    while let Some(segment) = segments.next() {
        value = match value {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) if segment == "length" => {
                return length(items.len(), segments.next());
            }
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            Value::String(s) if segment == "length" => {
                return length(s.chars().count(), segments.next());
            }
            _ => return None,
        };
    }
    Some(Cow::Borrowed(value))
}

/// A length is a number, so it must be the last segment
fn length<'a>(len: usize, rest: Option<&str>) -> Option<Cow<'a, Value>> {
    match rest {
        Some(_) => None,
        None => Some(Cow::Owned(Value::from(len))),
    }
}
