use crate::core::convert::Converter;
use crate::core::error::{Error, Result};
use crate::core::value::{Image, Value, ValueType};

/// Pass-through and widening conversions.
///
/// Handles identity for every type, `Integer -> Double`,
/// `Boolean -> Integer | Double`, `Mask -> Image` and scalar `-> Text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericConverter;

impl Converter for GenericConverter {
    fn name(&self) -> &str {
        "generic"
    }

    fn can_convert(&self, source: ValueType, destination: ValueType) -> bool {
        source == destination
            || matches!(
                (source, destination),
                (ValueType::Integer, ValueType::Double)
                    | (ValueType::Boolean, ValueType::Integer)
                    | (ValueType::Boolean, ValueType::Double)
                    | (ValueType::Mask, ValueType::Image)
                    | (ValueType::Integer, ValueType::Text)
                    | (ValueType::Double, ValueType::Text)
                    | (ValueType::Boolean, ValueType::Text)
            )
    }

    fn convert(&self, value: Value, destination: ValueType) -> Result<Value> {
        let Some(source) = value.value_type() else {
            return Ok(Value::Null);
        };
        if source == destination {
            return Ok(value);
        }
        let converted = match (value, destination) {
            (Value::Integer(v), ValueType::Double) => Value::Double(v as f64),
            (Value::Boolean(v), ValueType::Integer) => Value::Integer(i64::from(v)),
            (Value::Boolean(v), ValueType::Double) => Value::Double(if v { 1.0 } else { 0.0 }),
            (Value::Integer(v), ValueType::Text) => Value::Text(v.to_string()),
            (Value::Double(v), ValueType::Text) => Value::Text(v.to_string()),
            (Value::Boolean(v), ValueType::Text) => Value::Text(v.to_string()),
            (Value::Mask(mask), ValueType::Image) => {
                let pixels = mask
                    .cells()
                    .iter()
                    .map(|set| if *set { 1.0 } else { 0.0 })
                    .collect();
                let image = Image::from_pixels(mask.width(), mask.height(), pixels)
                    .ok_or(Error::UnsupportedConversion {
                        from: source,
                        to: destination,
                    })?;
                Value::from(image)
            }
            _ => {
                return Err(Error::UnsupportedConversion {
                    from: source,
                    to: destination,
                });
            }
        };
        Ok(converted)
    }
}
