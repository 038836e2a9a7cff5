pub mod async_impl;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod network;
pub mod node;
pub mod process;
pub mod telemetry;
pub mod validation;
pub mod value;

use std::any::Any;

/// A helper trait that just provides the `as_any` method.
/// Needed to downcast a `dyn Process` back to the type its descriptor was
/// registered for when extracting outputs.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
