//! Type conversion between producer outputs and consumer inputs.
//!
//! A [`ConverterRegistry`] holds an ordered chain of [`Converter`]s and uses
//! the first one that accepts a `(source, destination)` pair. Order matters:
//! specific converters have to be registered before generic fallbacks.

pub mod generic;
pub mod threshold;

use crate::core::error::{Error, Result};
use crate::core::value::{Value, ValueType};

pub use generic::GenericConverter;
pub use threshold::ThresholdConverter;

/// A single conversion strategy.
pub trait Converter: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this converter handles values of `source` type into `destination`.
    fn can_convert(&self, source: ValueType, destination: ValueType) -> bool;

    /// Converts `value` into `destination`. Only called after
    /// [`can_convert`](Converter::can_convert) accepted the pair.
    fn convert(&self, value: Value, destination: ValueType) -> Result<Value>;
}

/// Ordered, first-match chain of converters.
///
/// Built once at startup and read-only afterwards; share it behind an `Arc`.
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
}

impl Default for ConverterRegistry {
    /// The standard chain: [`GenericConverter`] then [`ThresholdConverter`].
    fn default() -> Self {
        Self::empty()
            .with_converter(GenericConverter)
            .with_converter(ThresholdConverter::default())
    }
}

impl ConverterRegistry {
    /// A registry without converters. Identity conversions still succeed.
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Appends a converter at the end of the chain.
    pub fn with_converter<C: Converter>(mut self, converter: C) -> Self {
        self.converters.push(Box::new(converter));
        self
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Converts `value` into `destination`, inferring the source type from
    /// the value itself. `Null` is returned untouched.
    pub fn convert(&self, value: Value, destination: ValueType) -> Result<Value> {
        match value.value_type() {
            None => Ok(Value::Null),
            Some(source) => self.convert_from(value, source, destination),
        }
    }

    /// Converts `value`, declared as `source`, into `destination`.
    pub fn convert_from(
        &self,
        value: Value,
        source: ValueType,
        destination: ValueType,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if source == destination {
            return Ok(value);
        }
        let converter = self
            .find(source, destination)
            .ok_or(Error::UnsupportedConversion {
                from: source,
                to: destination,
            })?;
        log::debug!(
            "Converting {} to {} with {}",
            source,
            destination,
            converter.name()
        );
        converter.convert(value, destination)
    }

    /// Whether some converter bridges `source` to `destination`.
    pub fn is_valid_conversion(&self, source: ValueType, destination: ValueType) -> bool {
        source == destination || self.find(source, destination).is_some()
    }

    fn find(&self, source: ValueType, destination: ValueType) -> Option<&dyn Converter> {
        self.converters
            .iter()
            .find(|c| c.can_convert(source, destination))
            .map(|c| c.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Image;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ALL_TYPES: [ValueType; 6] = [
        ValueType::Integer,
        ValueType::Double,
        ValueType::Boolean,
        ValueType::Text,
        ValueType::Image,
        ValueType::Mask,
    ];

    /// Accepts every pair and counts how often it was asked.
    struct CountingConverter {
        probes: Arc<AtomicUsize>,
        output: Value,
    }

    impl Converter for CountingConverter {
        fn name(&self) -> &str {
            "counting"
        }

        fn can_convert(&self, _source: ValueType, _destination: ValueType) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn convert(&self, _value: Value, _destination: ValueType) -> Result<Value> {
            Ok(self.output.clone())
        }
    }

    #[test]
    fn test_identity_is_valid_for_every_configuration() {
        let registries = [
            ConverterRegistry::empty(),
            ConverterRegistry::default(),
            ConverterRegistry::empty().with_converter(ThresholdConverter::new(0.2)),
        ];
        for registry in &registries {
            for ty in ALL_TYPES {
                assert!(registry.is_valid_conversion(ty, ty), "{ty} -> {ty}");
            }
        }
    }

    #[test]
    fn test_null_short_circuits_without_consulting_converters() {
        let probes = Arc::new(AtomicUsize::new(0));
        let registry = ConverterRegistry::empty().with_converter(CountingConverter {
            probes: probes.clone(),
            output: Value::Integer(1),
        });

        assert_eq!(registry.convert(Value::Null, ValueType::Double).unwrap(), Value::Null);
        assert_eq!(
            registry
                .convert_from(Value::Null, ValueType::Integer, ValueType::Double)
                .unwrap(),
            Value::Null
        );
        assert_eq!(probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_match_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let registry = ConverterRegistry::empty()
            .with_converter(CountingConverter {
                probes: first.clone(),
                output: Value::Text("first".into()),
            })
            .with_converter(CountingConverter {
                probes: second.clone(),
                output: Value::Text("second".into()),
            });

        let out = registry.convert(Value::Integer(1), ValueType::Text).unwrap();
        assert_eq!(out, Value::Text("first".into()));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_chain() {
        let registry = ConverterRegistry::default();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.convert(Value::Integer(5), ValueType::Double).unwrap(),
            Value::Double(5.0)
        );
        assert_eq!(
            registry.convert(Value::Double(0.7), ValueType::Boolean).unwrap(),
            Value::Boolean(true)
        );
        assert!(registry.is_valid_conversion(ValueType::Image, ValueType::Mask));
    }

    #[test]
    fn test_unsupported_conversion_names_both_types() {
        let registry = ConverterRegistry::default();
        let err = registry
            .convert(Value::from(Image::filled(1, 1, 0.0).unwrap()), ValueType::Integer)
            .unwrap_err();
        match err {
            Error::UnsupportedConversion { from, to } => {
                assert_eq!(from, ValueType::Image);
                assert_eq!(to, ValueType::Integer);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registry.is_valid_conversion(ValueType::Text, ValueType::Double));
    }
}
