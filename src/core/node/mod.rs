//! Nodes of a network and the wiring between them.

pub mod connector;
pub mod process_node;
pub mod source;

use crate::core::value::ValueType;
use std::fmt;
use uuid::Uuid;

pub use connector::{Connection, Connector};
pub use process_node::ProcessNode;
pub use source::SourceNode;

/// Stable identifier of a node inside a [`Network`](crate::Network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NodeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A unit of the network: either a literal source or a process step.
#[derive(Debug, Clone)]
pub enum Node {
    Source(SourceNode),
    Process(ProcessNode),
}

impl Node {
    /// Declared required inputs, in positional order. Empty for sources.
    pub fn input_parameters(&self) -> Vec<String> {
        match self {
            Node::Source(_) => Vec::new(),
            Node::Process(node) => node.descriptor().input_names(),
        }
    }

    /// Declared outputs.
    pub fn output_parameters(&self) -> Vec<String> {
        match self {
            Node::Source(node) => vec![node.output_name().to_string()],
            Node::Process(node) => node.descriptor().output_names(),
        }
    }

    pub fn has_output(&self, name: &str) -> bool {
        match self {
            Node::Source(node) => node.output_name() == name,
            Node::Process(node) => node.descriptor().output(name).is_some(),
        }
    }

    pub fn has_input(&self, name: &str) -> bool {
        match self {
            Node::Source(_) => false,
            Node::Process(node) => node.descriptor().input(name).is_some(),
        }
    }

    /// Type produced by output `name`. `None` for undeclared outputs and for
    /// sources holding `Null`.
    pub fn output_type(&self, name: &str) -> Option<ValueType> {
        match self {
            Node::Source(node) if node.output_name() == name => node.value().value_type(),
            Node::Source(_) => None,
            Node::Process(node) => node.descriptor().output(name).map(|o| o.value_type),
        }
    }

    /// The node's connector. Sources expose an empty one.
    pub fn connector(&self) -> &Connector {
        match self {
            Node::Source(node) => node.connector(),
            Node::Process(node) => node.connector(),
        }
    }

    pub fn as_source(&self) -> Option<&SourceNode> {
        match self {
            Node::Source(node) => Some(node),
            Node::Process(_) => None,
        }
    }

    pub fn as_process(&self) -> Option<&ProcessNode> {
        match self {
            Node::Process(node) => Some(node),
            Node::Source(_) => None,
        }
    }

    pub fn as_process_mut(&mut self) -> Option<&mut ProcessNode> {
        match self {
            Node::Process(node) => Some(node),
            Node::Source(_) => None,
        }
    }
}

impl From<SourceNode> for Node {
    fn from(node: SourceNode) -> Self {
        Node::Source(node)
    }
}

impl From<ProcessNode> for Node {
    fn from(node: ProcessNode) -> Self {
        Node::Process(node)
    }
}
