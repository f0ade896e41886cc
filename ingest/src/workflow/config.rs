use anyhow::Context;
use atmoscore::container::Field;
use atmoscore::convert::ConversionDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-instrument description of how raw container fields map to standard units.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestProfile {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub ts: Option<ConversionDescriptor>,
    #[serde(default)]
    pub rg: Option<ConversionDescriptor>,
    #[serde(default)]
    pub vel: Option<ConversionDescriptor>,
    #[serde(default)]
    pub var: Option<ConversionDescriptor>,
    #[serde(default)]
    pub rg_unit: Option<String>,
    #[serde(default)]
    pub var_unit: Option<String>,
    /// Written in place of masked samples when a container is exported.
    #[serde(default = "default_fill_value")]
    pub fill_value: f64,
}

fn default_fill_value() -> f64 {
    -999.0
}

impl IngestProfile {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading ingest profile {}", path_ref.display()))?;
        let profile: IngestProfile = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing ingest profile {}", path_ref.display()))?;
        Ok(profile)
    }

    /// Declared conversions in the order they are applied. `var` goes last so
    /// axis conversions never see a permuted spectrum.
    pub fn conversions(&self) -> Vec<(Field, &ConversionDescriptor)> {
        [
            (Field::Ts, &self.ts),
            (Field::Rg, &self.rg),
            (Field::Vel, &self.vel),
            (Field::Var, &self.var),
        ]
        .into_iter()
        .filter_map(|(field, descriptor)| descriptor.as_ref().map(|d| (field, d)))
        .collect()
    }
}
