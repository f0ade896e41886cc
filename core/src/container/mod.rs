//! Measurement container and its canonical `(time, range, velocity)` form.

pub mod format;
pub mod model;
pub mod reshape;

pub use format::pformat;
pub use model::{DataContainer, DimLayout, Field};
pub use reshape::{canonicalize, CanonicalSpectra};
