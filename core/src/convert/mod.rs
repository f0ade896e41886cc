//! String-keyed converter registry.
//!
//! Ingestion configuration names a conversion per variable (`"km2m"`,
//! `"since20010101"`, ...). [`resolve`] turns that name into a value transform
//! and a mask transform that always agree on the output shape.

pub mod axes;
pub mod conversion;
pub mod params;
pub mod registry;

pub use conversion::Conversion;
pub use params::{ConversionDescriptor, ConversionParams, ParamValue};
pub use registry::{resolve, Converter, MaskFn, ValueFn};
