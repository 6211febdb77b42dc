//! Minimal markup tree standing in for the host rendering surface
//!
//! Expanded template text is materialized into a [`Fragment`]. The fragment
//! supports what the renderer and its callers need from a surface: selector
//! queries, attribute edits, listener storage and event dispatch.

pub mod lexer;
mod selector;
mod tree;

pub use selector::Selector;
pub use tree::{Attribute, Element, Event, Fragment, Listener, Node};
