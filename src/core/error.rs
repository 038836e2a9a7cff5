use crate::core::node::NodeId;
use crate::core::value::ValueType;
use thiserror::Error;

/// Errors raised while wiring or evaluating a node network.
///
/// Every error is local to one evaluation call: it propagates up the
/// recursive resolution chain and ends up on the caller's result (or on the
/// [`Pending`](crate::Pending) handle when evaluated asynchronously).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Node {node} has no literal or connection for required input '{input}'")]
    UnresolvedInput { node: NodeId, input: String },

    #[error("Input '{input}' of node {node} is connected to node {target}, which is not in the network")]
    DanglingConnection {
        node: NodeId,
        input: String,
        target: NodeId,
    },

    #[error("Unknown conversion from {from} to {to}")]
    UnsupportedConversion { from: ValueType, to: ValueType },

    #[error("Process '{process}' could not be built from its inputs: {source}")]
    Construction {
        process: String,
        #[source]
        source: ProcessError,
    },

    #[error("Process '{process}' failed while running: {source}")]
    Invocation {
        process: String,
        #[source]
        source: ProcessError,
    },

    #[error("Node {node} has no attribute named '{name}'")]
    UnknownAttribute { node: NodeId, name: String },

    #[error("Node {0} is not part of the network")]
    UnknownNode(NodeId),

    #[error("Node {node} depends on its own output")]
    CycleDetected { node: NodeId },

    #[error("Invalid process descriptor '{process}': {reason}")]
    InvalidDescriptor { process: String, reason: String },

    #[error("The network has no output node")]
    NoOutputNode,

    #[error("Evaluation worker failed: {0}")]
    WorkerFailed(String),
}

/// Errors reported by process implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    #[error("expected {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("argument {index} should be {expected}, got {found}")]
    InvalidArgument {
        index: usize,
        expected: ValueType,
        found: String,
    },

    #[error("{0}")]
    Failed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
