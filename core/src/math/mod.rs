pub mod db;
pub mod masked;
pub mod search;
pub mod stats;

pub use db::{lin2z, lin2z_array, z2lin, z2lin_array};
pub use masked::{fill_with, lin2z_masked, MaskedArray};
pub use search::{argnearest, nearest};
pub use stats::{MaskedStats, StatsHelper};
