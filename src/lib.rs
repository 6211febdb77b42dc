//! template-wire - directive templates with declarative event bindings
//!
//! Templates are markup with four kinds of directives:
//!
//! - `@for (item of items) ... @endfor`
//! - `@if (condition) ... @else ... @endif`
//! - `{{dot.path}}` (and `{{expression}}` inside loop bodies)
//! - `(event)="handler(arg1, arg2)"`
//!
//! A [`Renderer`] expands them against a JSON data context, materializes the
//! result into a [`Fragment`], and binds each event declaration to the named
//! handler of a [`Component`].
//!
//! # Example
//!
//! ```rust
//! use template_wire::{BasicComponent, Renderer};
//! use serde_json::json;
//!
//! let mut renderer = Renderer::new();
//! let mut counter = BasicComponent::new(0i64)
//!     .with_handler("add", |n, args| *n += args[0].parse::<i64>().unwrap_or(0));
//!
//! let data = json!({"label": "Add five"});
//! let fragment = renderer.render(
//!     r#"<button (click)="add(5)">{{label}}</button>"#,
//!     &counter,
//!     data.as_object().unwrap(),
//! );
//!
//! assert_eq!(fragment.to_markup(), "<button>Add five</button>");
//! fragment.dispatch("button", "click", &mut counter);
//! assert_eq!(counter.state, 5);
//! ```

pub mod component;
pub mod dom;
pub mod error;
pub mod eval;
pub mod expand;
pub mod registry;
pub mod renderer;

#[cfg(test)]
mod log_capture;

pub use component::{BasicComponent, Component, ComponentId, HandlerTable};
pub use dom::{Element, Event, Fragment, Node, Selector};
pub use error::EvalError;
pub use eval::{evaluate_or_empty, Context, Evaluator, ExpressionEvaluator};
pub use registry::{HandlerRecord, HandlerRegistry};
pub use renderer::{ConfigError, RenderConfig, Renderer, TemplateCache, TemplateError};

/// Expand a template to markup with default configuration
///
/// Event bindings are left as marker attributes since there is no component
/// to bind them to.
///
/// # Example
///
/// ```rust
/// use template_wire::render_markup;
/// use serde_json::json;
///
/// let data = json!({"items": ["a", "b"]});
/// let markup = render_markup(
///     "<ul>@for (i of items)<li>{{i}}</li>@endfor</ul>",
///     data.as_object().unwrap(),
/// );
/// assert_eq!(markup, "<ul><li>a</li><li>b</li></ul>");
/// ```
pub fn render_markup(template: &str, data: &Context) -> String {
    render_markup_with_config(template, data, RenderConfig::default())
}

/// Expand a template to markup with custom configuration
pub fn render_markup_with_config(template: &str, data: &Context, config: RenderConfig) -> String {
    let mut renderer = Renderer::new().with_config(config);
    let host = BasicComponent::new(());
    let markup = renderer.render(template, &host, data).to_markup();
    renderer.evict(host.id());
    markup
}
