//! # visflow
//!
//! The execution engine behind a visual, node-based image-processing tool.
//! Users wire processing steps into a graph; visflow pulls the designated
//! output through that graph and hands back the resulting value.
//!
//! ## Features
//!
//! - **Declarative processes**: a step registers its ordered inputs, named
//!   outputs and positional constructor once, through a [`ProcessDescriptor`]
//! - **Pull evaluation**: requesting an output recursively resolves literals
//!   and upstream connections, with no caching between requests
//! - **Type reconciliation**: mismatched values are converted through an
//!   ordered, first-match [`ConverterRegistry`]
//! - **Non-blocking**: [`EvaluationDriver`] evaluates on tokio's blocking pool
//!   and returns a [`Pending`] handle with chainable continuations
//!
//! ## Quick Start
//!
//! ```rust
//! use visflow::prelude::*;
//! use std::sync::Arc;
//!
//! struct Double {
//!     x: f64,
//!     y: f64,
//! }
//!
//! impl Process for Double {
//!     fn run(&mut self) -> Result<(), ProcessError> {
//!         self.y = self.x * 2.0;
//!         Ok(())
//!     }
//! }
//!
//! let descriptor = ProcessDescriptor::builder::<Double>("double")
//!     .input("x", ValueType::Double)
//!     .output("y", ValueType::Double, |p| Value::Double(p.y))
//!     .build(|args| Ok(Double { x: args.double(0)?, y: 0.0 }))
//!     .unwrap();
//!
//! let mut network = Network::new();
//! let source = network.add_source(5);
//! let double = network.add_process(Arc::new(descriptor));
//! network.connect(double, "x", source, "value").unwrap();
//! network.set_output(double, "y").unwrap();
//!
//! let converters = ConverterRegistry::default();
//! assert_eq!(network.evaluate(&converters).unwrap(), Value::Double(10.0));
//! ```
//!
//! ## Module Organization
//!
//! - [`crate::core::value`]: runtime values and their type tags
//! - [`crate::core::convert`]: the converter registry and built-in converters
//! - [`crate::core::process`]: process descriptors and their registry
//! - [`crate::core::node`], [`crate::core::network`]: nodes, connections and the node arena
//! - [`crate::core::evaluator`]: the pull evaluation algorithm
//! - [`crate::core::async_impl`]: asynchronous evaluation and the active workspace
//! - [`prelude`]: commonly used types (import with `use visflow::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

pub mod core;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Errors
pub use crate::core::error::{Error, ProcessError, Result};

// Values and conversion
pub use crate::core::convert::{Converter, ConverterRegistry, GenericConverter, ThresholdConverter};
pub use crate::core::value::{Image, Mask, Value, ValueType};

// Processes
pub use crate::core::process::{
    DescriptorBuilder, InputSpec, OutputSpec, Process, ProcessArgs, ProcessDescriptor,
    ProcessRegistry,
};

// Graph and evaluation
pub use crate::core::evaluator::Evaluator;
pub use crate::core::network::Network;
pub use crate::core::node::{Connection, Connector, Node, NodeId, ProcessNode, SourceNode};
pub use crate::core::telemetry::{MemoryTelemetry, Telemetry, TraceEntry};
pub use crate::core::validation::{Severity, ValidationIssue, ValidationResult};

// Asynchronous evaluation
pub use crate::core::async_impl::driver::EvaluationDriver;
pub use crate::core::async_impl::pending::Pending;
pub use crate::core::async_impl::workspace::Workspace;

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything needed to register processes, build
/// networks and evaluate them.
///
/// # Example
/// ```rust
/// use visflow::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        // Conversion
        ConverterRegistry,
        // Errors
        Error,
        // Async
        EvaluationDriver,
        Image,
        Mask,
        // Graph
        Network,
        Node,
        NodeId,
        Pending,
        // Processes
        Process,
        ProcessArgs,
        ProcessDescriptor,
        ProcessError,
        ProcessRegistry,
        SourceNode,
        // Values
        Value,
        ValueType,
        Workspace,
    };
}

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
