//! Conversion and reshaping core for the remote-sensing toolkit.
//!
//! Instruments disagree on epochs, units and axis order. The [`convert`]
//! registry turns a short converter name into a matched value/mask transform
//! pair, and [`container::canonicalize`] expands a measurement container to
//! the fixed `(time, range, velocity)` layout every consumer assumes.

pub mod container;
pub mod convert;
pub mod epoch;
pub mod math;
pub mod prelude;
pub mod util;

pub use prelude::{CoreError, CoreResult};
