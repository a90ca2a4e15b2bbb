//! The output-store interface.
//!
//! The extraction engine writes through this trait only; the reference
//! backend is a hierarchical binary container (HDF5) supplied by the
//! embedding application. An in-memory backend ships here for tests and
//! inspection. Two flat-text formats are declared in the output-format
//! contract but have no backend.

mod memory;

pub use memory::{Entry, MemoryStore};

use crate::util::{Error, Result, Shape};

/// A scalar attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Text value. Booleans are rendered as text by the callers that
    /// own their renderings (`true`/`false`, `yes`/`no`).
    Text(String),
    /// 32-bit integer value.
    Int(i32),
    /// Single-precision value.
    Float(f32),
    /// Double-precision value.
    Double(f64),
}

impl Scalar {
    /// Text scalar from anything string-like.
    pub fn text(value: impl AsRef<str>) -> Self {
        Scalar::Text(value.as_ref().to_string())
    }

    /// True when the value is its type's zero/empty value. The sparse
    /// write policy skips such scalars.
    pub fn is_zero_or_empty(&self) -> bool {
        match self {
            Scalar::Text(value) => value.is_empty(),
            Scalar::Int(value) => *value == 0,
            Scalar::Float(value) => *value == 0.0,
            Scalar::Double(value) => *value == 0.0,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

/// Typed payload of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData {
    /// 32-bit integers.
    Int(Vec<i32>),
    /// Single-precision values.
    Float(Vec<f32>),
    /// Double-precision values.
    Double(Vec<f64>),
    /// Text values.
    Text(Vec<String>),
}

impl ArrayData {
    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Int(values) => values.len(),
            ArrayData::Float(values) => values.len(),
            ArrayData::Double(values) => values.len(),
            ArrayData::Text(values) => values.len(),
        }
    }

    /// True when no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A row-major dataset value: typed payload plus shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    /// The payload.
    pub data: ArrayData,
    /// Row-major shape; `data.len()` equals the shape's element count.
    pub shape: Shape,
}

impl Array {
    /// 1D integer array.
    pub fn ints(values: Vec<i32>) -> Self {
        let shape = Shape::d1(values.len());
        Self { data: ArrayData::Int(values), shape }
    }

    /// 1D single-precision array.
    pub fn floats(values: Vec<f32>) -> Self {
        let shape = Shape::d1(values.len());
        Self { data: ArrayData::Float(values), shape }
    }

    /// 1D double-precision array.
    pub fn doubles(values: Vec<f64>) -> Self {
        let shape = Shape::d1(values.len());
        Self { data: ArrayData::Double(values), shape }
    }

    /// 1D text array.
    pub fn text(values: Vec<String>) -> Self {
        let shape = Shape::d1(values.len());
        Self { data: ArrayData::Text(values), shape }
    }

    /// Reshape the array, keeping the payload.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no values are stored. Empty arrays are never written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Abstract hierarchical output container.
///
/// Paths are absolute, `/`-separated and created once; writing into a
/// path that already exists is a store fault.
pub trait Store {
    /// Create a group. The parent group must already exist.
    fn create_group(&mut self, path: &str) -> Result<()>;

    /// Write a scalar attribute on an existing group.
    fn write_attribute(&mut self, path: &str, name: &str, value: Scalar) -> Result<()>;

    /// Write a dataset `name` under the group at `path`.
    fn write_dataset(&mut self, path: &str, name: &str, value: Array) -> Result<()>;

    /// Create a hard link at `path` resolving to the payload at `target`.
    fn create_link(&mut self, target: &str, path: &str) -> Result<()>;
}

/// Declared output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Hierarchical binary container; the reference backend.
    Hdf5,
    /// Flat-text JSON rendering.
    Json,
    /// Flat-text YAML rendering.
    Yaml,
}

impl OutputFormat {
    /// Parse a CLI-layer format string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "h5" | "hdf5" => Some(OutputFormat::Hdf5),
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// Canonical name of the format.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Hdf5 => "h5",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Resolve a built-in backend for `format`.
///
/// The HDF5 backend lives with the embedding application and is passed in
/// as a [`Store`] implementation; the flat-text formats are declared but
/// not implemented, so every variant currently reports an error rather
/// than panicking.
pub fn backend(format: OutputFormat) -> Result<Box<dyn Store>> {
    match format {
        OutputFormat::Hdf5 => Err(Error::store(
            "/",
            "the hdf5 backend is supplied by the embedding application",
        )),
        OutputFormat::Json | OutputFormat::Yaml => {
            Err(Error::UnsupportedFormat(format.label().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_zero_or_empty() {
        assert!(Scalar::text("").is_zero_or_empty());
        assert!(Scalar::Int(0).is_zero_or_empty());
        assert!(Scalar::Float(0.0).is_zero_or_empty());
        assert!(Scalar::Double(0.0).is_zero_or_empty());
        assert!(!Scalar::text("false").is_zero_or_empty());
        assert!(!Scalar::Int(-1).is_zero_or_empty());
        assert!(!Scalar::Double(0.25).is_zero_or_empty());
    }

    #[test]
    fn test_array_shapes() {
        let array = Array::floats(vec![0.0; 24]).with_shape(Shape::d3(2, 3, 4));
        assert_eq!(array.len(), 24);
        assert_eq!(array.shape.sizes(), &[2, 3, 4]);
        assert!(Array::ints(Vec::new()).is_empty());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("h5"), Some(OutputFormat::Hdf5));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("vtk"), None);
    }

    #[test]
    fn test_text_formats_unimplemented() {
        assert!(matches!(
            backend(OutputFormat::Json),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            backend(OutputFormat::Yaml),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(backend(OutputFormat::Hdf5), Err(Error::Store { .. })));
    }
}
