//! Markup tree: fragments, elements, listeners

use crate::component::Component;
use crate::dom::lexer::{scan, Piece};
use crate::dom::selector::Selector;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes like `disabled`
    pub value: Option<String>,
}

/// An event listener bound to a named component handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub event_type: String,
    pub handler_name: String,
    /// Literal string arguments passed on every invocation
    pub args: Vec<String>,
}

/// A dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: String,
    default_prevented: bool,
}

impl Event {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            default_prevented: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    listeners: Vec<Listener>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Value of an attribute; boolean attributes read as `""`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        self.attributes.len() != before
    }

    pub fn add_event_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        write_nodes(&self.children, out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Raw text, written back exactly as parsed
    Text(String),
    Comment(String),
}

/// A parsed piece of markup with no single root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize markup into a tree
    ///
    /// Parsing is forgiving: stray closing tags are dropped and elements left
    /// open at the end of input are closed implicitly.
    pub fn parse(markup: &str) -> Self {
        // Stack of open elements; the fragment root lives below them
        let mut root: Vec<Node> = Vec::new();
        let mut open: Vec<Element> = Vec::new();

        for piece in scan(markup) {
            match piece {
                Piece::Text(text) => push_node(&mut root, &mut open, Node::Text(text)),
                Piece::Comment(text) => push_node(&mut root, &mut open, Node::Comment(text)),
                Piece::Open {
                    name,
                    attributes,
                    self_closing,
                } => {
                    let mut element = Element::new(name);
                    for (name, value) in attributes {
                        // First occurrence wins, as in HTML
                        if !element.has_attribute(&name) {
                            element.attributes.push(Attribute { name, value });
                        }
                    }
                    if self_closing || element.is_void() {
                        push_node(&mut root, &mut open, Node::Element(element));
                    } else {
                        open.push(element);
                    }
                }
                Piece::Close(name) => {
                    let Some(depth) = open.iter().rposition(|e| e.tag == name) else {
                        continue;
                    };
                    while open.len() > depth {
                        close_top(&mut root, &mut open);
                    }
                }
            }
        }

        while !open.is_empty() {
            close_top(&mut root, &mut open);
        }

        Self { nodes: root }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Move every node of `other` to the end of this fragment
    pub fn append(&mut self, other: Fragment) {
        self.nodes.extend(other.nodes);
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// First element matching a CSS-style selector, in document order
    pub fn query(&self, selector: &str) -> Option<&Element> {
        let selector = Selector::parse(selector)?;
        self.find(&selector)
    }

    pub fn query_mut(&mut self, selector: &str) -> Option<&mut Element> {
        let selector = Selector::parse(selector)?;
        self.find_mut(&selector)
    }

    /// Every element matching a selector, in document order
    pub fn query_all(&self, selector: &str) -> Vec<&Element> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        collect_matches(&self.nodes, &selector, &mut found);
        found
    }

    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        find_in(&self.nodes, selector)
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        find_in_mut(&mut self.nodes, selector)
    }

    /// Fire `event_type` on the first element matching `selector`
    ///
    /// Every listener for that event prevents the default action and calls
    /// its handler on `host`. Returns `None` when no element matches.
    pub fn dispatch<C: Component + ?Sized>(
        &self,
        selector: &str,
        event_type: &str,
        host: &mut C,
    ) -> Option<Event> {
        let element = self.query(selector)?;
        let mut event = Event::new(event_type);
        for listener in element.listeners.iter().filter(|l| l.event_type == event_type) {
            event.prevent_default();
            host.call_handler(&listener.handler_name, &listener.args);
        }
        Some(event)
    }
}

fn push_node(root: &mut Vec<Node>, open: &mut [Element], node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

fn close_top(root: &mut Vec<Node>, open: &mut Vec<Element>) {
    if let Some(element) = open.pop() {
        push_node(root, open, Node::Element(element));
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(element) => element.write_markup(out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(element) => collect_text(&element.children, out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(_) => {}
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], selector: &Selector) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if selector.matches(element) {
                return Some(element);
            }
            if let Some(found) = find_in(&element.children, selector) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], selector: &Selector) -> Option<&'a mut Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if selector.matches(element) {
                return Some(element);
            }
            if let Some(found) = find_in_mut(&mut element.children, selector) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_matches<'a>(nodes: &'a [Node], selector: &Selector, found: &mut Vec<&'a Element>) {
    for node in nodes {
        if let Node::Element(element) = node {
            if selector.matches(element) {
                found.push(element);
            }
            collect_matches(&element.children, selector, found);
        }
    }
}
