//! Renderer: template text in, wired-up fragment out
//!
//! The renderer owns everything that outlives a single render: the
//! configuration, the expression evaluator, the handler registry and the
//! template cache.

pub mod cache;
pub mod config;

pub use cache::{TemplateCache, TemplateError};
pub use config::{ConfigError, RenderConfig};

use std::path::Path;

use log::error;

use crate::component::{Component, ComponentId};
use crate::dom::{Element, Fragment, Listener, Node, Selector};
use crate::eval::{Context, Evaluator, ExpressionEvaluator};
use crate::expand::expand;
use crate::registry::HandlerRegistry;

#[derive(Debug)]
pub struct Renderer<E: Evaluator = ExpressionEvaluator> {
    config: RenderConfig,
    evaluator: E,
    registry: HandlerRegistry,
    cache: TemplateCache,
}

impl Default for Renderer<ExpressionEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<ExpressionEvaluator> {
    /// Create a renderer with the bundled evaluator and default configuration
    pub fn new() -> Self {
        Self::with_evaluator(ExpressionEvaluator)
    }
}

impl<E: Evaluator> Renderer<E> {
    /// Create a renderer that evaluates expressions with `evaluator`
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            config: RenderConfig::default(),
            evaluator,
            registry: HandlerRegistry::new(),
            cache: TemplateCache::new(),
        }
    }

    /// Set the rendering configuration
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the template cache (e.g. one with a base path)
    pub fn with_cache(mut self, cache: TemplateCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Expand `template` to markup text, recording `host`'s event bindings
    pub fn expand<C: Component + ?Sized>(
        &mut self,
        template: &str,
        host: &C,
        data: &Context,
    ) -> String {
        expand(
            template,
            data,
            &self.evaluator,
            host.id(),
            &mut self.registry,
            &self.config,
        )
    }

    /// Expand, materialize and wire up a template for `host`
    pub fn render<C: Component + ?Sized>(
        &mut self,
        template: &str,
        host: &C,
        data: &Context,
    ) -> Fragment {
        let markup = self.expand(template, host, data);
        let mut fragment = Fragment::parse(&markup);
        self.attach(&mut fragment, host);
        fragment
    }

    /// Bind `host`'s recorded handlers to the marked elements of `fragment`
    ///
    /// Records whose marker is not in the fragment, or whose handler the
    /// host does not have, are skipped silently and leave the marker alone.
    pub fn attach<C: Component + ?Sized>(&self, fragment: &mut Fragment, host: &C) {
        for record in self.registry.records(host.id()) {
            let selector = Selector::attribute(&self.config.marker_attribute, &record.handler_id);
            let Some(element) = fragment.find_mut(&selector) else {
                continue;
            };
            if !host.has_handler(&record.handler_name) {
                continue;
            }
            element.remove_attribute(&self.config.marker_attribute);
            element.add_event_listener(Listener {
                event_type: record.event_type.clone(),
                handler_name: record.handler_name.clone(),
                args: record.args(),
            });
        }
    }

    /// Render `host`'s stored template again and replace its surface content
    ///
    /// The surface's style block text survives; everything else is
    /// replaced. Without a template or a surface nothing is touched.
    pub fn rerender<C: Component + ?Sized>(&mut self, host: &mut C, data: &Context) {
        let Some(template) = host.template().map(str::to_owned) else {
            error!("Invalid component or missing template: {} has no template", host.id());
            return;
        };
        let Some(style_text) = host.surface().map(|surface| {
            surface
                .query(&self.config.style_selector)
                .map(Element::text_content)
                .unwrap_or_default()
        }) else {
            error!("Invalid component or missing template: {} has no surface", host.id());
            return;
        };

        let fragment = self.render(&template, &*host, data);

        let mut style = Element::new("style");
        style.children.push(Node::Text(style_text));
        let mut content = Fragment::new();
        content.push(Node::Element(style));
        content.append(fragment);

        self.attach(&mut content, &*host);

        if let Some(surface) = host.surface_mut() {
            *surface = content;
        }
    }

    /// Drop the registry entry of a component that will not render again
    pub fn evict(&mut self, component: ComponentId) -> bool {
        self.registry.evict(component).is_some()
    }

    /// Template text from the cache, reading `path` on first use
    pub fn load_template(&mut self, path: &Path) -> Result<&str, TemplateError> {
        self.cache.load(path)
    }

    pub fn cache_mut(&mut self) -> &mut TemplateCache {
        &mut self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::BasicComponent;
    use crate::log_capture::{capture, errors};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn context(value: Value) -> Context {
        value.as_object().cloned().unwrap_or_default()
    }

    #[derive(Debug, Default)]
    struct Calls(Vec<(String, Vec<String>)>);

    fn recorder() -> BasicComponent<Calls> {
        BasicComponent::new(Calls::default())
            .with_handler("save", |calls, args| calls.0.push(("save".to_string(), args.to_vec())))
    }

    #[test]
    fn test_render_binds_listener_with_string_args() {
        let mut renderer = Renderer::new();
        let mut host = recorder();
        let fragment = renderer.render(
            r#"<button id="b" (click)="save(1, 2)">Save</button>"#,
            &host,
            &Context::new(),
        );

        let button = fragment.query("#b").unwrap();
        assert!(!button.has_attribute("data-event-handler-id"));
        assert_eq!(button.listeners().len(), 1);

        let event = fragment.dispatch("#b", "click", &mut host).unwrap();
        assert!(event.default_prevented());
        assert_eq!(
            host.state.0,
            vec![("save".to_string(), vec!["1".to_string(), "2".to_string()])]
        );
    }

    #[test]
    fn test_other_events_do_not_fire() {
        let mut renderer = Renderer::new();
        let mut host = recorder();
        let fragment = renderer.render(r#"<a id="a" (click)="save()">x</a>"#, &host, &Context::new());

        let event = fragment.dispatch("#a", "mouseover", &mut host).unwrap();
        assert!(!event.default_prevented());
        assert!(host.state.0.is_empty());
    }

    #[test]
    fn test_missing_handler_keeps_marker() {
        let mut renderer = Renderer::new();
        let host = recorder();
        let fragment = renderer.render(r#"<a (click)="remove(3)">x</a>"#, &host, &Context::new());

        let link = fragment.query("a").unwrap();
        assert_eq!(link.attribute("data-event-handler-id"), Some("handler_0"));
        assert!(link.listeners().is_empty());
    }

    #[test]
    fn test_render_resets_previous_records() {
        let mut renderer = Renderer::new();
        let host = recorder();
        let two = r#"<a (click)="save()"></a><b (click)="save()"></b>"#;
        let one = r#"<a (click)="save()"></a>"#;

        renderer.render(two, &host, &Context::new());
        assert_eq!(renderer.registry().count(host.id()), 2);
        renderer.render(one, &host, &Context::new());
        assert_eq!(renderer.registry().count(host.id()), 1);
    }

    #[test]
    fn test_rerender_replaces_surface_and_keeps_style() {
        let mut renderer = Renderer::new();
        let mut host = recorder()
            .with_template(r#"<p>{{label}}</p><button (click)="save({{n}})">go</button>"#)
            .with_surface(Fragment::parse("<style>p { color: red; }</style><p>old</p>"));

        renderer.rerender(&mut host, &context(json!({"label": "fresh", "n": 7})));

        let surface = host.surface().unwrap();
        assert_eq!(
            surface.to_markup(),
            "<style>p { color: red; }</style><p>fresh</p><button>go</button>"
        );
        host.dispatch("button", "click");
        assert_eq!(host.state.0, vec![("save".to_string(), vec!["7".to_string()])]);
    }

    #[test]
    fn test_rerender_without_style_inserts_empty_style() {
        let mut renderer = Renderer::new();
        let mut host = BasicComponent::new(())
            .with_template("<p>x</p>")
            .with_surface(Fragment::new());
        renderer.rerender(&mut host, &Context::new());
        assert_eq!(host.surface().unwrap().to_markup(), "<style></style><p>x</p>");
    }

    #[test]
    fn test_rerender_without_template_or_surface_does_nothing() {
        let mut renderer = Renderer::new();

        let mut no_template = BasicComponent::new(()).with_surface(Fragment::parse("<p>keep</p>"));
        renderer.rerender(&mut no_template, &Context::new());
        assert_eq!(no_template.surface().unwrap().to_markup(), "<p>keep</p>");
        assert_eq!(renderer.registry().len(), 0);

        let mut no_surface = BasicComponent::new(()).with_template(r#"<a (click)="x()"></a>"#);
        renderer.rerender(&mut no_surface, &Context::new());
        assert!(no_surface.surface().is_none());
        assert_eq!(renderer.registry().len(), 0);
    }

    #[test]
    fn test_invalid_rerender_logs_error() {
        let mut renderer = Renderer::new();

        let mut no_template = BasicComponent::new(()).with_surface(Fragment::new());
        let (_, records) = capture(|| renderer.rerender(&mut no_template, &Context::new()));
        let logged = errors(&records);
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("has no template"), "logged {:?}", logged);
        assert!(logged[0].contains(&no_template.id().to_string()));

        let mut no_surface = BasicComponent::new(()).with_template("<p></p>");
        let (_, records) = capture(|| renderer.rerender(&mut no_surface, &Context::new()));
        let logged = errors(&records);
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("has no surface"), "logged {:?}", logged);
    }

    #[test]
    fn test_evict() {
        let mut renderer = Renderer::new();
        let host = recorder();
        renderer.render(r#"<a (click)="save()"></a>"#, &host, &Context::new());
        assert!(renderer.evict(host.id()));
        assert!(!renderer.evict(host.id()));
        assert!(renderer.registry().is_empty());
    }

    #[test]
    fn test_custom_config_marker() {
        let mut renderer =
            Renderer::new().with_config(RenderConfig::new().with_marker_attribute("data-on"));
        let host = BasicComponent::new(());
        let fragment = renderer.render(r#"<a (click)="nope()"></a>"#, &host, &Context::new());
        assert_eq!(fragment.to_markup(), r#"<a data-on="handler_0"></a>"#);
    }
}
