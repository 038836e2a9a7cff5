use crate::core::node::NodeId;
use std::collections::HashMap;

/// A binding of one input to another node's named output.
///
/// Holds the producer's [`NodeId`], never the node itself: a removed producer
/// shows up as a lookup miss at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub node: NodeId,
    pub attribute: String,
}

impl Connection {
    pub fn new(node: NodeId, attribute: impl Into<String>) -> Self {
        Self {
            node,
            attribute: attribute.into(),
        }
    }
}

/// Per-node map from input name to its [`Connection`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connector {
    connections: HashMap<String, Connection>,
}

impl Connector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `input` to `attribute` of `node`, returning the binding it replaced.
    pub fn add_connection(
        &mut self,
        input: impl Into<String>,
        node: NodeId,
        attribute: impl Into<String>,
    ) -> Option<Connection> {
        let input = input.into();
        let previous = self
            .connections
            .insert(input.clone(), Connection::new(node, attribute));
        if let Some(previous) = &previous {
            log::warn!(
                "Input '{}' was already connected to {}.{}, replacing the connection.",
                input,
                previous.node,
                previous.attribute
            );
        }
        previous
    }

    pub fn remove_connection(&mut self, input: &str) -> Option<Connection> {
        self.connections.remove(input)
    }

    pub fn connection(&self, input: &str) -> Option<&Connection> {
        self.connections.get(input)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Connection)> {
        self.connections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
