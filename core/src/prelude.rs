pub use crate::container::{canonicalize, CanonicalSpectra, DataContainer, DimLayout, Field};
pub use crate::convert::{resolve, Conversion, ConversionDescriptor, ConversionParams, Converter};
pub use crate::math::MaskedArray;

/// Common error type for conversion and reshaping.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("converter {0} not defined")]
    UnknownConverter(String),
    #[error("converter {converter} requires parameter {param}")]
    MissingParameter {
        converter: &'static str,
        param: &'static str,
    },
    #[error("parameter {param} is not a {expected}")]
    InvalidParameter {
        param: String,
        expected: &'static str,
    },
    #[error("wrong data format: dimlabel {0:?}")]
    UnsupportedLayout(Vec<String>),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("empty array: {0}")]
    EmptyArray(String),
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(f64),
}

pub type CoreResult<T> = Result<T, CoreError>;
