use crate::core::node::Connector;
use crate::core::value::Value;

/// Output name used by [`SourceNode::new`].
pub const DEFAULT_SOURCE_OUTPUT: &str = "value";

/// Wraps an externally supplied value (an input image, a constant) and
/// exposes it under a single output name.
#[derive(Debug, Clone)]
pub struct SourceNode {
    value: Value,
    output: String,
    connector: Connector,
}

impl SourceNode {
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_output(DEFAULT_SOURCE_OUTPUT, value)
    }

    pub fn with_output(output: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            output: output.into(),
            connector: Connector::new(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn output_name(&self) -> &str {
        &self.output
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// The held value when `name` is this node's output.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        (name == self.output).then_some(&self.value)
    }
}
