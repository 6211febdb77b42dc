//! Handler registry: event bindings recorded per component

use std::collections::HashMap;

use crate::component::ComponentId;

/// One declarative event binding found during a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRecord {
    pub event_type: String,
    pub handler_name: String,
    /// Raw text between the handler's parentheses
    pub params: String,
    /// Marker value correlating the record to a generated element
    pub handler_id: String,
}

impl HandlerRecord {
    /// Parameters as passed to the handler: split on commas, trimmed,
    /// never coerced
    pub fn args(&self) -> Vec<String> {
        if self.params.is_empty() {
            return Vec::new();
        }
        self.params.split(',').map(|p| p.trim().to_string()).collect()
    }
}

/// Records of each component's most recent render
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    records: HashMap<ComponentId, Vec<HandlerRecord>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render: drop whatever the previous render recorded
    pub fn reset(&mut self, component: ComponentId) {
        self.records.insert(component, Vec::new());
    }

    /// Number of records currently held for a component
    pub fn count(&self, component: ComponentId) -> usize {
        self.records.get(&component).map_or(0, Vec::len)
    }

    pub fn push(&mut self, component: ComponentId, record: HandlerRecord) {
        self.records.entry(component).or_default().push(record);
    }

    /// Records in scan order; empty when the component never rendered
    pub fn records(&self, component: ComponentId) -> &[HandlerRecord] {
        self.records.get(&component).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Forget a component entirely
    pub fn evict(&mut self, component: ComponentId) -> Option<Vec<HandlerRecord>> {
        self.records.remove(&component)
    }

    /// Number of components with an entry
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
