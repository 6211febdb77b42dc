//! Event-binding extraction and the `translate` attribute rewrite

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::component::ComponentId;
use crate::registry::{HandlerRecord, HandlerRegistry};
use crate::renderer::RenderConfig;

/// `(event)="handler(params)"`
static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\((\w+)\)="(\w+)\(([^)]*)\)""#).expect("event binding pattern")
});

/// The keyword plus what decides whether it is left alone: an existing
/// `data-` prefix or a following `(` (a call such as `translate(...)`)
static TRANSLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(data-)?\btranslate\b(\()?").expect("translate pattern"));

/// Rewrite the bare `translate` marker to `attribute`
pub fn rewrite_translate(text: &str, attribute: &str) -> String {
    TRANSLATE
        .replace_all(text, |caps: &Captures| {
            if caps.get(1).is_some() || caps.get(2).is_some() {
                caps[0].to_string()
            } else {
                attribute.to_string()
            }
        })
        .into_owned()
}

/// Record every event binding for `component` and replace it with a marker
///
/// Ids continue from the component's current record count, so callers
/// reset the registry first to get `handler_0`, `handler_1`, ... per render.
pub fn bind_events(
    text: &str,
    component: ComponentId,
    registry: &mut HandlerRegistry,
    config: &RenderConfig,
) -> String {
    BINDING
        .replace_all(text, |caps: &Captures| {
            let handler_id = config.handler_id(registry.count(component));
            registry.push(
                component,
                HandlerRecord {
                    event_type: caps[1].to_string(),
                    handler_name: caps[2].to_string(),
                    params: caps[3].to_string(),
                    handler_id: handler_id.clone(),
                },
            );
            format!(r#"{}="{}""#, config.marker_attribute, handler_id)
        })
        .into_owned()
}
