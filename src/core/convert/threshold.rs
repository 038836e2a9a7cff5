use crate::core::convert::Converter;
use crate::core::error::{Error, Result};
use crate::core::value::{Mask, Value, ValueType};

/// Default cutoff used by [`ThresholdConverter::default`].
pub const DEFAULT_CUTOFF: f64 = 0.5;

/// Converts continuous values into their binary counterpart.
///
/// Scalars become booleans and images become masks; a value is "set" when it
/// is greater than or equal to the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdConverter {
    cutoff: f64,
}

impl Default for ThresholdConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl ThresholdConverter {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Converter for ThresholdConverter {
    fn name(&self) -> &str {
        "threshold"
    }

    fn can_convert(&self, source: ValueType, destination: ValueType) -> bool {
        matches!(
            (source, destination),
            (ValueType::Integer, ValueType::Boolean)
                | (ValueType::Double, ValueType::Boolean)
                | (ValueType::Image, ValueType::Mask)
        )
    }

    fn convert(&self, value: Value, destination: ValueType) -> Result<Value> {
        let converted = match (&value, destination) {
            (Value::Integer(v), ValueType::Boolean) => Value::Boolean(*v as f64 >= self.cutoff),
            (Value::Double(v), ValueType::Boolean) => Value::Boolean(*v >= self.cutoff),
            (Value::Image(img), ValueType::Mask) => {
                let cells = img.pixels().iter().map(|p| *p >= self.cutoff).collect();
                Mask::from_cells(img.width(), img.height(), cells)
                    .map(Value::from)
                    .ok_or(Error::UnsupportedConversion {
                        from: ValueType::Image,
                        to: ValueType::Mask,
                    })?
            }
            (Value::Null, _) => Value::Null,
            (other, to) => {
                return Err(Error::UnsupportedConversion {
                    from: other.value_type().unwrap_or(to),
                    to,
                });
            }
        };
        Ok(converted)
    }
}
