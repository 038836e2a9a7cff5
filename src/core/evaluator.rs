//! Pull-based evaluation of a node output.
//!
//! Requesting an output of a process node resolves every declared input in
//! order (literal first, connection second), converts each value to the
//! declared input type, builds a fresh process instance from the positional
//! argument list, runs it once and extracts the requested output.
//!
//! Nothing is cached: shared ancestors reachable through several paths are
//! recomputed once per path.

use crate::core::convert::ConverterRegistry;
use crate::core::error::{Error, Result};
use crate::core::network::Network;
use crate::core::node::{Node, NodeId, ProcessNode};
use crate::core::process::{InputSpec, ProcessArgs};
use crate::core::telemetry::{self, Telemetry, TraceEntry};
use crate::core::value::Value;

/// One evaluation pass over a network.
///
/// The evaluator only reads the network. It keeps the chain of process nodes
/// currently being resolved so that a connection cycle fails with
/// [`Error::CycleDetected`] instead of recursing forever.
pub struct Evaluator<'a> {
    network: &'a Network,
    converters: &'a ConverterRegistry,
    telemetry: Option<&'a dyn Telemetry>,
    path: Vec<NodeId>,
}

impl<'a> Evaluator<'a> {
    pub fn new(network: &'a Network, converters: &'a ConverterRegistry) -> Self {
        Self {
            network,
            converters,
            telemetry: None,
            path: Vec::new(),
        }
    }

    /// Records every process invocation into `telemetry`.
    pub fn with_telemetry(mut self, telemetry: &'a dyn Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Computes output `name` of node `id`.
    pub fn attribute(&mut self, id: NodeId, name: &str) -> Result<Value> {
        let network = self.network;
        match network.node(id).ok_or(Error::UnknownNode(id))? {
            Node::Source(source) => {
                source
                    .attribute(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownAttribute {
                        node: id,
                        name: name.to_string(),
                    })
            }
            Node::Process(process) => {
                if process.descriptor().output(name).is_none() {
                    return Err(Error::UnknownAttribute {
                        node: id,
                        name: name.to_string(),
                    });
                }
                if self.path.contains(&id) {
                    return Err(Error::CycleDetected { node: id });
                }
                self.path.push(id);
                let result = self.run_process(id, process, name);
                self.path.pop();
                result
            }
        }
    }

    fn run_process(&mut self, id: NodeId, node: &ProcessNode, output: &str) -> Result<Value> {
        let descriptor = node.descriptor();

        let mut values = Vec::with_capacity(descriptor.inputs().len());
        for input in descriptor.inputs() {
            values.push(self.resolve_input(id, node, input)?);
        }
        let args = ProcessArgs::new(values);
        let traced_inputs = self.telemetry.map(|_| args.values().to_vec());

        log::debug!(
            "Running process '{}' of node {} for output '{}'",
            descriptor.id(),
            id,
            output
        );
        let mut process = descriptor
            .instantiate(args)
            .map_err(|source| Error::Construction {
                process: descriptor.id().to_string(),
                source,
            })?;
        process.run().map_err(|source| Error::Invocation {
            process: descriptor.id().to_string(),
            source,
        })?;
        let value = descriptor
            .extract(process.as_ref(), output)
            .ok_or_else(|| Error::UnknownAttribute {
                node: id,
                name: output.to_string(),
            })?;

        if let (Some(telemetry), Some(inputs)) = (self.telemetry, traced_inputs) {
            telemetry.record(TraceEntry {
                timestamp: telemetry::now(),
                node: id,
                process: descriptor.id().to_string(),
                inputs,
                output: output.to_string(),
                value: value.clone(),
            });
        }
        Ok(value)
    }

    fn resolve_input(&mut self, id: NodeId, node: &ProcessNode, input: &InputSpec) -> Result<Value> {
        let value = match node.parameter(&input.name) {
            Some(literal) => literal.clone(),
            None => {
                let connection = node.connector().connection(&input.name).ok_or_else(|| {
                    Error::UnresolvedInput {
                        node: id,
                        input: input.name.clone(),
                    }
                })?;
                if !self.network.contains(connection.node) {
                    return Err(Error::DanglingConnection {
                        node: id,
                        input: input.name.clone(),
                        target: connection.node,
                    });
                }
                self.attribute(connection.node, &connection.attribute)?
            }
        };
        self.converters.convert(value, input.value_type)
    }
}
