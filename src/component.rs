//! Host components: identity and by-name handler dispatch

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::{Event, Fragment};

/// Opaque identity of a component, used as the handler-registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate an id no other component in this process has
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// A caller-owned object the renderer binds event handlers to
///
/// The renderer only ever looks handlers up by name and calls them; it
/// never owns the component. `template`, `surface` and `surface_mut` are
/// needed for re-rendering only.
pub trait Component {
    fn id(&self) -> ComponentId;

    /// Whether `name` refers to a callable handler
    fn has_handler(&self, name: &str) -> bool;

    /// Invoke handler `name` with literal string arguments
    fn call_handler(&mut self, name: &str, args: &[String]);

    /// Stored template text
    fn template(&self) -> Option<&str> {
        None
    }

    /// The surface this component's markup lives in
    fn surface(&self) -> Option<&Fragment> {
        None
    }

    fn surface_mut(&mut self) -> Option<&mut Fragment> {
        None
    }

    /// Fire `event_type` on the first element of the surface matching
    /// `selector`
    ///
    /// The surface is detached while handlers run and put back afterwards.
    /// `None` without a surface or a matching element.
    fn dispatch(&mut self, selector: &str, event_type: &str) -> Option<Event> {
        let surface = std::mem::take(self.surface_mut()?);
        let event = surface.dispatch(selector, event_type, &mut *self);
        if let Some(slot) = self.surface_mut() {
            *slot = surface;
        }
        event
    }
}

/// Handler callable on state `S`
pub type Handler<S> = fn(&mut S, &[String]);

/// Name → handler registration table
pub struct HandlerTable<S> {
    handlers: HashMap<String, Handler<S>>,
}

impl<S> Default for HandlerTable<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<S> fmt::Debug for HandlerTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerTable").field("handlers", &names).finish()
    }
}

impl<S> HandlerTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a handler
    pub fn register(&mut self, name: impl Into<String>, handler: Handler<S>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, handler: Handler<S>) -> Self {
        self.register(name, handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Handler<S>> {
        self.handlers.get(name).copied()
    }
}

/// A ready-made component: state plus a handler table, optional template
/// and surface
#[derive(Debug)]
pub struct BasicComponent<S> {
    id: ComponentId,
    pub state: S,
    handlers: HandlerTable<S>,
    template: Option<String>,
    surface: Option<Fragment>,
}

impl<S> BasicComponent<S> {
    pub fn new(state: S) -> Self {
        Self {
            id: ComponentId::next(),
            state,
            handlers: HandlerTable::new(),
            template: None,
            surface: None,
        }
    }

    pub fn with_handlers(mut self, handlers: HandlerTable<S>) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_handler(mut self, name: impl Into<String>, handler: Handler<S>) -> Self {
        self.handlers.register(name, handler);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Attach an (initially empty or pre-populated) rendering surface
    pub fn with_surface(mut self, surface: Fragment) -> Self {
        self.surface = Some(surface);
        self
    }
}

impl<S> Component for BasicComponent<S> {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains(name)
    }

    fn call_handler(&mut self, name: &str, args: &[String]) {
        if let Some(handler) = self.handlers.get(name) {
            handler(&mut self.state, args);
        }
    }

    fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    fn surface(&self) -> Option<&Fragment> {
        self.surface.as_ref()
    }

    fn surface_mut(&mut self) -> Option<&mut Fragment> {
        self.surface.as_mut()
    }
}
