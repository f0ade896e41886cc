use crate::workflow::config::IngestProfile;
use anyhow::Context;
use atmoscore::container::{canonicalize, CanonicalSpectra, DataContainer};
use log::info;
use std::fs;
use std::path::Path;

pub struct IngestResult {
    pub container: DataContainer,
    pub canonical: CanonicalSpectra,
    pub applied: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    profile: IngestProfile,
}

impl Runner {
    pub fn new(profile: IngestProfile) -> Self {
        Self { profile }
    }

    /// Applies the profile's conversions to a copy of `raw`, then canonicalizes it.
    pub fn execute(&self, raw: &DataContainer) -> anyhow::Result<IngestResult> {
        let mut container = raw.clone();
        let mut applied = Vec::new();

        for (field, descriptor) in self.profile.conversions() {
            let converter = descriptor
                .resolve()
                .with_context(|| format!("resolving converter for {}", field))?;
            container
                .apply(field, &converter)
                .with_context(|| format!("applying {} to {}", descriptor.converter, field))?;
            applied.push(format!("{}: {}", field, descriptor.converter));
        }

        if let Some(system) = &self.profile.system {
            container.system = system.clone();
        }
        if let Some(unit) = &self.profile.rg_unit {
            container.rg_unit = unit.clone();
        }
        if let Some(unit) = &self.profile.var_unit {
            container.var_unit = unit.clone();
        }

        let canonical = canonicalize(&container).context("canonicalizing container")?;
        let (n_ts, n_rg, n_vel) = canonical.shape();
        info!(
            "ingested {} {} -> ({}, {}, {}) after {} conversions",
            container.system,
            container.name,
            n_ts,
            n_rg,
            n_vel,
            applied.len()
        );

        Ok(IngestResult {
            container,
            canonical,
            applied,
        })
    }

    /// Writes `container` as JSON with masked samples replaced by the fill value.
    pub fn export<P: AsRef<Path>>(&self, container: &DataContainer, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let mut exported = container.clone();
        exported.var = container
            .masked_var()
            .context("pairing spectra with mask")?
            .filled(self.profile.fill_value);

        if let Some(parent) = path_ref.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string(&exported).context("serializing container")?;
        fs::write(path_ref, text).with_context(|| format!("writing {}", path_ref.display()))?;
        Ok(())
    }
}

pub fn load_container<P: AsRef<Path>>(path: P) -> anyhow::Result<DataContainer> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading container {}", path_ref.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing container {}", path_ref.display()))
}
