//! The node arena.
//!
//! A [`Network`] owns every node, keyed by [`NodeId`]. Connections only hold
//! ids, so removing a node leaves dangling connections behind that surface
//! as [`Error::DanglingConnection`] when evaluated.

use crate::core::convert::ConverterRegistry;
use crate::core::error::{Error, Result};
use crate::core::evaluator::Evaluator;
use crate::core::node::{Connection, Node, NodeId, ProcessNode, SourceNode};
use crate::core::process::ProcessDescriptor;
use crate::core::validation::ValidationResult;
use crate::core::value::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: HashMap<NodeId, Node>,
    output: Option<Connection>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<Node>) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, node.into());
        id
    }

    /// Adds a source node exposing `value` under its default output name.
    pub fn add_source(&mut self, value: impl Into<Value>) -> NodeId {
        self.add_node(SourceNode::new(value))
    }

    pub fn add_process(&mut self, descriptor: Arc<ProcessDescriptor>) -> NodeId {
        self.add_node(ProcessNode::new(descriptor))
    }

    /// Removes a node. Connections pointing at it are left untouched.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Node ids, sorted.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Wires `input` of `consumer` to `output` of `producer`, replacing any
    /// previous connection of that input.
    ///
    /// Both ends must exist and declare the named attribute. Types and cycles
    /// are not checked here; see [`Network::validate`].
    pub fn connect(
        &mut self,
        consumer: NodeId,
        input: &str,
        producer: NodeId,
        output: &str,
    ) -> Result<Option<Connection>> {
        let producer_node = self.node(producer).ok_or(Error::UnknownNode(producer))?;
        if !producer_node.has_output(output) {
            return Err(Error::UnknownAttribute {
                node: producer,
                name: output.to_string(),
            });
        }
        let process = self.process_input_mut(consumer, input)?;
        Ok(process.add_connection(input, producer, output))
    }

    pub fn disconnect(&mut self, consumer: NodeId, input: &str) -> Result<Option<Connection>> {
        let process = self.process_input_mut(consumer, input)?;
        Ok(process.remove_connection(input))
    }

    /// Sets a literal for `input` of `node`, returning the previous literal.
    pub fn set_parameter(
        &mut self,
        node: NodeId,
        input: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let process = self.process_input_mut(node, input)?;
        Ok(process.set_parameter(input, value))
    }

    pub fn remove_parameter(&mut self, node: NodeId, input: &str) -> Result<Option<Value>> {
        let process = self.process_input_mut(node, input)?;
        Ok(process.remove_parameter(input))
    }

    /// Designates `attribute` of `node` as the network's final output.
    pub fn set_output(&mut self, node: NodeId, attribute: &str) -> Result<()> {
        let target = self.node(node).ok_or(Error::UnknownNode(node))?;
        if !target.has_output(attribute) {
            return Err(Error::UnknownAttribute {
                node,
                name: attribute.to_string(),
            });
        }
        self.output = Some(Connection::new(node, attribute));
        Ok(())
    }

    pub fn output(&self) -> Option<&Connection> {
        self.output.as_ref()
    }

    /// Adds a copy of `id` to the network. Process copies keep their literals
    /// but none of their connections.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId> {
        let copy = match self.node(id).ok_or(Error::UnknownNode(id))? {
            Node::Source(source) => Node::Source(source.clone()),
            Node::Process(process) => Node::Process(process.duplicate()),
        };
        Ok(self.add_node(copy))
    }

    /// Synchronously evaluates output `name` of node `id`.
    pub fn attribute(&self, id: NodeId, name: &str, converters: &ConverterRegistry) -> Result<Value> {
        Evaluator::new(self, converters).attribute(id, name)
    }

    /// Synchronously evaluates the designated output.
    pub fn evaluate(&self, converters: &ConverterRegistry) -> Result<Value> {
        let output = self.output.as_ref().ok_or(Error::NoOutputNode)?;
        self.attribute(output.node, &output.attribute, converters)
    }

    /// Static check of the wiring, without running any process.
    pub fn validate(&self, converters: &ConverterRegistry) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &self.output {
            None => result.error(None, "The network has no output node."),
            Some(output) => match self.node(output.node) {
                None => result.error(Some(output.node), format!(
                    "The output node {} is not part of the network.",
                    output.node
                )),
                Some(node) if !node.has_output(&output.attribute) => result.error(
                    Some(output.node),
                    format!(
                        "The output node {} has no attribute '{}'.",
                        output.node, output.attribute
                    ),
                ),
                Some(_) => {}
            },
        }

        for id in self.ids() {
            if let Some(Node::Process(process)) = self.node(id) {
                self.validate_inputs(id, process, converters, &mut result);
            }
        }

        let mut done = HashSet::new();
        let mut path = Vec::new();
        for id in self.ids() {
            self.find_cycles(id, &mut path, &mut done, &mut result);
        }

        result
    }

    fn validate_inputs(
        &self,
        id: NodeId,
        process: &ProcessNode,
        converters: &ConverterRegistry,
        result: &mut ValidationResult,
    ) {
        for input in process.descriptor().inputs() {
            if let Some(literal) = process.parameter(&input.name) {
                if let Some(ty) = literal.value_type() {
                    if !converters.is_valid_conversion(ty, input.value_type) {
                        result.error(Some(id), format!(
                            "Node {} input '{}' holds a {} literal, which cannot convert to {}.",
                            id, input.name, ty, input.value_type
                        ));
                    }
                }
                continue;
            }

            let Some(connection) = process.connector().connection(&input.name) else {
                result.error(Some(id), format!(
                    "Node {} requires input '{}' which has no literal and no connection.",
                    id, input.name
                ));
                continue;
            };

            let Some(producer) = self.node(connection.node) else {
                result.error(Some(id), format!(
                    "Node {} input '{}' is connected to missing node {}.",
                    id, input.name, connection.node
                ));
                continue;
            };

            if !producer.has_output(&connection.attribute) {
                result.error(Some(id), format!(
                    "Node {} input '{}' reads unknown attribute '{}' of node {}.",
                    id, input.name, connection.attribute, connection.node
                ));
            } else if let Some(ty) = producer.output_type(&connection.attribute) {
                if !converters.is_valid_conversion(ty, input.value_type) {
                    result.error(Some(id), format!(
                        "Node {} input '{}' expects {} but node {} produces {}.",
                        id, input.name, input.value_type, connection.node, ty
                    ));
                }
            }
        }
    }

    fn find_cycles(
        &self,
        id: NodeId,
        path: &mut Vec<NodeId>,
        done: &mut HashSet<NodeId>,
        result: &mut ValidationResult,
    ) {
        if done.contains(&id) {
            return;
        }
        if path.contains(&id) {
            result.warning(Some(id), format!(
                "Node {} is part of a connection cycle and cannot be evaluated.",
                id
            ));
            return;
        }
        let Some(node) = self.node(id) else {
            return;
        };

        path.push(id);
        let mut upstream: Vec<NodeId> = node.connector().iter().map(|(_, c)| c.node).collect();
        upstream.sort_unstable();
        upstream.dedup();
        for next in upstream {
            self.find_cycles(next, path, done, result);
        }
        path.pop();
        done.insert(id);
    }

    fn process_input_mut(&mut self, id: NodeId, input: &str) -> Result<&mut ProcessNode> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        if !node.has_input(input) {
            return Err(Error::UnknownAttribute {
                node: id,
                name: input.to_string(),
            });
        }
        node.as_process_mut().ok_or(Error::UnknownAttribute {
            node: id,
            name: input.to_string(),
        })
    }
}
