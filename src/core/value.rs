//! Runtime values flowing across node connections.
//!
//! Values are type-erased behind [`Value`] and carry their own [`ValueType`]
//! tag. The evaluator never inspects them; types only matter at the
//! conversion boundary (see [`ConverterRegistry`](crate::ConverterRegistry)).

use serde_json::json;
use std::fmt;
use std::sync::Arc;

/// The runtime type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    Integer,
    Double,
    Boolean,
    Text,
    Image,
    Mask,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Integer => "integer",
            ValueType::Double => "double",
            ValueType::Boolean => "boolean",
            ValueType::Text => "text",
            ValueType::Image => "image",
            ValueType::Mask => "mask",
        };
        f.write_str(name)
    }
}

/// A single-channel image with intensities in `0.0..=1.0`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl Image {
    /// Creates an image filled with `value`, or `None` when the pixel count
    /// overflows `usize`.
    pub fn filled(width: usize, height: usize, value: f64) -> Option<Self> {
        let len = width.checked_mul(height)?;
        Some(Self {
            width,
            height,
            pixels: vec![value; len],
        })
    }

    /// Wraps an existing pixel buffer. Returns `None` when the buffer length
    /// does not match the dimensions.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f64>) -> Option<Self> {
        (width.checked_mul(height)? == pixels.len()).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }
}

/// A binary image, typically produced by thresholding an [`Image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Option<Self> {
        (width.checked_mul(height)? == cells.len()).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}

/// A type-erased value produced by a node output or held as a literal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Text(String),
    Image(Arc<Image>),
    Mask(Arc<Mask>),
}

impl Value {
    /// The runtime type of this value, or `None` for [`Value::Null`].
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(ValueType::Integer),
            Value::Double(_) => Some(ValueType::Double),
            Value::Boolean(_) => Some(ValueType::Boolean),
            Value::Text(_) => Some(ValueType::Text),
            Value::Image(_) => Some(ValueType::Image),
            Value::Mask(_) => Some(ValueType::Mask),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Arc<Image>> {
        match self {
            Value::Image(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mask(&self) -> Option<&Arc<Mask>> {
        match self {
            Value::Mask(v) => Some(v),
            _ => None,
        }
    }

    /// Builds a literal from a JSON value, as handed over by an editor.
    ///
    /// Arrays and objects have no literal form and map to [`Value::Null`].
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Double).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            _ => Value::Null,
        }
    }

    /// JSON rendering of this value. Images and masks only expose their
    /// dimensions.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Integer(v) => json!(v),
            Value::Double(v) => json!(v),
            Value::Boolean(v) => json!(v),
            Value::Text(v) => json!(v),
            Value::Image(img) => json!({
                "type": "image",
                "width": img.width(),
                "height": img.height(),
            }),
            Value::Mask(mask) => json!({
                "type": "mask",
                "width": mask.width(),
                "height": mask.height(),
            }),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Image> for Value {
    fn from(v: Image) -> Self {
        Value::Image(Arc::new(v))
    }
}

impl From<Mask> for Value {
    fn from(v: Mask) -> Self {
        Value::Mask(Arc::new(v))
    }
}
