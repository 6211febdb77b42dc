//! Directive expansion
//!
//! Template text goes through a fixed sequence of textual passes:
//!
//! 1. loops (`@for`), with loop-local `{{expression}}`s evaluated per element
//! 2. conditionals (`@if`/`@else`), evaluated against the outer data
//! 3. top-level `{{dot.path}}` substitution (no expression evaluation)
//! 4. `translate` → `data-translate`
//! 5. event bindings → registry records plus marker attributes
//!
//! The order is observable. An `@if` inside a loop body is resolved after
//! the loop, against the outer data only, once per copied body. A
//! `{{a + b}}` outside any loop is left as written.

mod conditionals;
mod events;
mod interpolation;
mod loops;

pub use conditionals::expand_conditionals;
pub use events::{bind_events, rewrite_translate};
pub use interpolation::{interpolate, resolve_path};
pub use loops::expand_loops;

use log::debug;

use crate::component::ComponentId;
use crate::eval::{Context, Evaluator};
use crate::registry::HandlerRegistry;
use crate::renderer::RenderConfig;

/// Run every pass over `template`
///
/// `component`'s registry entry is reset before the event-binding pass, so
/// afterwards it holds exactly the bindings of this template.
pub fn expand<E: Evaluator + ?Sized>(
    template: &str,
    data: &Context,
    evaluator: &E,
    component: ComponentId,
    registry: &mut HandlerRegistry,
    config: &RenderConfig,
) -> String {
    let text = expand_loops(template, data, evaluator);
    let text = expand_conditionals(&text, data, evaluator);
    let text = interpolate(&text, data);
    let text = rewrite_translate(&text, &config.translate_attribute);

    registry.reset(component);
    let text = bind_events(&text, component, registry, config);
    debug!(
        "Expanded template for {} with {} event bindings",
        component,
        registry.count(component)
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ExpressionEvaluator;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn run(template: &str, data: Value) -> (String, HandlerRegistry, ComponentId) {
        let data = data.as_object().cloned().unwrap_or_default();
        let mut registry = HandlerRegistry::new();
        let id = ComponentId::next();
        let out = expand(
            template,
            &data,
            &ExpressionEvaluator,
            id,
            &mut registry,
            &RenderConfig::default(),
        );
        (out, registry, id)
    }

    #[test]
    fn test_full_pipeline() {
        let (out, registry, id) = run(
            r#"<h1 translate>{{title}}</h1>@for (t of todos)<li (click)="toggle({{t.id}})">{{t.text}}</li>@endfor@if (todos.length > 1)<p>many</p>@endif"#,
            json!({"title": "Todos", "todos": [{"id": 1, "text": "a"}, {"id": 2, "text": "b"}]}),
        );
        assert_eq!(
            out,
            r#"<h1 data-translate>Todos</h1><li data-event-handler-id="handler_0">a</li><li data-event-handler-id="handler_1">b</li><p>many</p>"#
        );
        let params: Vec<_> = registry.records(id).iter().map(|r| r.params.as_str()).collect();
        assert_eq!(params, vec!["1", "2"]);
    }

    #[test]
    fn test_conditional_inside_loop_sees_outer_data_only() {
        // `x` is not in the outer data, so the condition fails and is falsy
        let (out, _, _) = run(
            "@for (x of xs)[@if (x)yes@else no@endif]@endfor",
            json!({"xs": [1, 2]}),
        );
        assert_eq!(out, "[ no][ no]");
    }

    #[test]
    fn test_conditional_inside_loop_uses_outer_binding() {
        let (out, _, _) = run(
            "@for (x of xs)[@if (flag)on@endif]@endfor",
            json!({"xs": [1, 2], "flag": true}),
        );
        assert_eq!(out, "[on][on]");
    }

    #[test]
    fn test_nested_loop_is_not_supported() {
        // the outer @for closes at the first @endfor, and `b` is unbound
        // when the inner body expression is evaluated
        let (out, _, _) = run(
            "@for (a of as)@for (b of bs){{b}}@endfor@endfor",
            json!({"as": [1], "bs": [2]}),
        );
        assert_eq!(out, "@for (b of bs)@endfor");
    }
}
