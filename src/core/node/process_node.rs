use crate::core::node::{Connection, Connector, NodeId};
use crate::core::process::ProcessDescriptor;
use crate::core::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A node that runs a registered process.
///
/// Each required input is fed either by a literal parameter or by a
/// connection; literals take precedence.
#[derive(Debug, Clone)]
pub struct ProcessNode {
    descriptor: Arc<ProcessDescriptor>,
    connector: Connector,
    parameters: HashMap<String, Value>,
}

impl ProcessNode {
    pub fn new(descriptor: Arc<ProcessDescriptor>) -> Self {
        Self {
            descriptor,
            connector: Connector::new(),
            parameters: HashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &Arc<ProcessDescriptor> {
        &self.descriptor
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    /// Sets a literal for `input`, returning the previous literal.
    pub fn set_parameter(&mut self, input: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.parameters.insert(input.into(), value.into())
    }

    pub fn remove_parameter(&mut self, input: &str) -> Option<Value> {
        self.parameters.remove(input)
    }

    pub fn parameter(&self, input: &str) -> Option<&Value> {
        self.parameters.get(input)
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    pub fn add_connection(
        &mut self,
        input: impl Into<String>,
        node: NodeId,
        attribute: impl Into<String>,
    ) -> Option<Connection> {
        self.connector.add_connection(input, node, attribute)
    }

    pub fn remove_connection(&mut self, input: &str) -> Option<Connection> {
        self.connector.remove_connection(input)
    }

    /// A copy sharing the descriptor and literals, without any connection.
    pub fn duplicate(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            connector: Connector::new(),
            parameters: self.parameters.clone(),
        }
    }
}
