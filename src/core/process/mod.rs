//! The contract between the engine and external processing steps.
//!
//! - [`Process`] is the runtime side: a freshly constructed instance that is
//!   run exactly once per evaluation.
//! - [`ProcessDescriptor`] is the registration side: the ordered inputs, the
//!   named outputs and how to build an instance from positional arguments.
//! - [`ProcessRegistry`] maps identifiers to descriptors.

pub mod descriptor;
pub mod registry;

use crate::core::AsAny;
use crate::core::error::ProcessError;
use crate::core::value::{Image, Mask, Value, ValueType};
use std::sync::Arc;

pub use descriptor::{DescriptorBuilder, InputSpec, OutputSpec, ProcessDescriptor};
pub use registry::ProcessRegistry;

/// A processing step instance.
///
/// Instances are built from already converted arguments, run once, and then
/// queried through the descriptor's output accessors.
pub trait Process: AsAny + Send + 'static {
    /// Execute the processing step.
    fn run(&mut self) -> Result<(), ProcessError>;
}

/// Positional arguments handed to a process constructor, in the descriptor's
/// declared input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessArgs {
    values: Vec<Value>,
}

impl ProcessArgs {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Fails with [`ProcessError::ArityMismatch`] unless exactly `expected`
    /// arguments are present.
    pub fn expect_len(&self, expected: usize) -> Result<(), ProcessError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ProcessError::ArityMismatch {
                expected,
                found: self.values.len(),
            })
        }
    }

    pub fn value(&self, index: usize) -> Result<&Value, ProcessError> {
        self.values.get(index).ok_or(ProcessError::ArityMismatch {
            expected: index + 1,
            found: self.values.len(),
        })
    }

    pub fn integer(&self, index: usize) -> Result<i64, ProcessError> {
        let value = self.value(index)?;
        value
            .as_integer()
            .ok_or_else(|| mismatch(index, ValueType::Integer, value))
    }

    pub fn double(&self, index: usize) -> Result<f64, ProcessError> {
        let value = self.value(index)?;
        value
            .as_double()
            .ok_or_else(|| mismatch(index, ValueType::Double, value))
    }

    pub fn boolean(&self, index: usize) -> Result<bool, ProcessError> {
        let value = self.value(index)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(index, ValueType::Boolean, value))
    }

    pub fn text(&self, index: usize) -> Result<&str, ProcessError> {
        let value = self.value(index)?;
        value
            .as_text()
            .ok_or_else(|| mismatch(index, ValueType::Text, value))
    }

    pub fn image(&self, index: usize) -> Result<Arc<Image>, ProcessError> {
        let value = self.value(index)?;
        value
            .as_image()
            .cloned()
            .ok_or_else(|| mismatch(index, ValueType::Image, value))
    }

    pub fn mask(&self, index: usize) -> Result<Arc<Mask>, ProcessError> {
        let value = self.value(index)?;
        value
            .as_mask()
            .cloned()
            .ok_or_else(|| mismatch(index, ValueType::Mask, value))
    }
}

fn mismatch(index: usize, expected: ValueType, found: &Value) -> ProcessError {
    ProcessError::InvalidArgument {
        index,
        expected,
        found: found
            .value_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "null".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let args = ProcessArgs::new(vec![Value::Double(1.5), Value::Integer(2), "x".into()]);
        assert_eq!(args.double(0).unwrap(), 1.5);
        assert_eq!(args.integer(1).unwrap(), 2);
        assert_eq!(args.text(2).unwrap(), "x");
        assert!(args.expect_len(3).is_ok());
    }

    #[test]
    fn test_wrong_type_reports_index_and_types() {
        let args = ProcessArgs::new(vec![Value::Null, Value::Integer(2)]);
        assert_eq!(
            args.double(0).unwrap_err(),
            ProcessError::InvalidArgument {
                index: 0,
                expected: ValueType::Double,
                found: "null".to_string(),
            }
        );
        assert_eq!(
            args.boolean(1).unwrap_err(),
            ProcessError::InvalidArgument {
                index: 1,
                expected: ValueType::Boolean,
                found: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_out_of_range_is_arity_mismatch() {
        let args = ProcessArgs::new(vec![Value::Integer(1)]);
        assert_eq!(
            args.integer(2).unwrap_err(),
            ProcessError::ArityMismatch {
                expected: 3,
                found: 1
            }
        );
        assert!(args.expect_len(2).is_err());
    }
}
