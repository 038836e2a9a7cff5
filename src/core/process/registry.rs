use crate::core::node::ProcessNode;
use crate::core::process::ProcessDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps process identifiers to their registered descriptors.
///
/// Filled once at startup, then used to create process nodes by identifier.
#[derive(Default, Clone)]
pub struct ProcessRegistry {
    descriptors: HashMap<String, Arc<ProcessDescriptor>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor under its own id, replacing any previous one.
    pub fn register(&mut self, descriptor: ProcessDescriptor) -> Arc<ProcessDescriptor> {
        let descriptor = Arc::new(descriptor);
        if self
            .descriptors
            .insert(descriptor.id().to_string(), descriptor.clone())
            .is_some()
        {
            log::warn!(
                "Process '{}' was already registered, replacing its descriptor.",
                descriptor.id()
            );
        }
        descriptor
    }

    pub fn get(&self, id: &str) -> Option<Arc<ProcessDescriptor>> {
        self.descriptors.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Creates an unwired process node for the process registered as `id`.
    pub fn create_node(&self, id: &str) -> Option<ProcessNode> {
        self.get(id).map(ProcessNode::new)
    }
}
