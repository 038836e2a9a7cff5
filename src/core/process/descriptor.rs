use crate::core::error::{Error, ProcessError, Result};
use crate::core::process::{Process, ProcessArgs};
use crate::core::value::{Value, ValueType};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Constructor = Arc<dyn Fn(ProcessArgs) -> Result<Box<dyn Process>, ProcessError> + Send + Sync>;
type Extractor = Arc<dyn Fn(&dyn Process) -> Option<Value> + Send + Sync>;

/// A declared process input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub name: String,
    pub value_type: ValueType,
}

/// A declared process output together with its accessor.
#[derive(Clone)]
pub struct OutputSpec {
    pub name: String,
    pub value_type: ValueType,
    extract: Extractor,
}

impl fmt::Debug for OutputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSpec")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// The immutable contract of a processing step.
///
/// Input order is the positional construction order: the evaluator builds
/// the argument list in exactly this order.
pub struct ProcessDescriptor {
    id: String,
    inputs: Vec<InputSpec>,
    outputs: Vec<OutputSpec>,
    constructor: Constructor,
}

impl fmt::Debug for ProcessDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessDescriptor")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl ProcessDescriptor {
    /// Starts the registration of process type `P` under `id`.
    pub fn builder<P: Process>(id: impl Into<String>) -> DescriptorBuilder<P> {
        DescriptorBuilder {
            id: id.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            _process: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputSpec> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn input_names(&self) -> Vec<String> {
        self.inputs.iter().map(|i| i.name.clone()).collect()
    }

    pub fn output_names(&self) -> Vec<String> {
        self.outputs.iter().map(|o| o.name.clone()).collect()
    }

    /// Builds a fresh process instance from positional arguments.
    pub fn instantiate(&self, args: ProcessArgs) -> Result<Box<dyn Process>, ProcessError> {
        args.expect_len(self.inputs.len())?;
        (self.constructor)(args)
    }

    /// Reads output `name` from an instance built by this descriptor.
    ///
    /// Returns `None` when the output is not declared or `process` is not an
    /// instance of the registered type.
    pub fn extract(&self, process: &dyn Process, name: &str) -> Option<Value> {
        self.output(name).and_then(|o| (o.extract)(process))
    }
}

/// Builder returned by [`ProcessDescriptor::builder`].
pub struct DescriptorBuilder<P> {
    id: String,
    inputs: Vec<InputSpec>,
    outputs: Vec<OutputSpec>,
    _process: PhantomData<fn() -> P>,
}

impl<P: Process> DescriptorBuilder<P> {
    /// Declares the next positional input.
    pub fn input(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.inputs.push(InputSpec {
            name: name.into(),
            value_type,
        });
        self
    }

    /// Declares an output and the accessor that reads it from a run instance.
    pub fn output<F>(mut self, name: impl Into<String>, value_type: ValueType, accessor: F) -> Self
    where
        F: Fn(&P) -> Value + Send + Sync + 'static,
    {
        let extract: Extractor =
            Arc::new(move |process: &dyn Process| process.as_any().downcast_ref::<P>().map(&accessor));
        self.outputs.push(OutputSpec {
            name: name.into(),
            value_type,
            extract,
        });
        self
    }

    /// Finishes the registration with the positional constructor of `P`.
    pub fn build<F>(self, constructor: F) -> Result<ProcessDescriptor>
    where
        F: Fn(ProcessArgs) -> Result<P, ProcessError> + Send + Sync + 'static,
    {
        check_unique(&self.id, "input", self.inputs.iter().map(|i| i.name.as_str()))?;
        check_unique(&self.id, "output", self.outputs.iter().map(|o| o.name.as_str()))?;

        let constructor: Constructor = Arc::new(move |args: ProcessArgs| {
            constructor(args).map(|p| Box::new(p) as Box<dyn Process>)
        });
        Ok(ProcessDescriptor {
            id: self.id,
            inputs: self.inputs,
            outputs: self.outputs,
            constructor,
        })
    }
}

fn check_unique<'a>(id: &str, kind: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(Error::InvalidDescriptor {
                process: id.to_string(),
                reason: format!("duplicate {} '{}'", kind, name),
            });
        }
    }
    Ok(())
}
