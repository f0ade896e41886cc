use anyhow::Context;
use atmoscore::container::{DataContainer, DimLayout};
use ndarray::{Array, Array1, ArrayD};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating synthetic Doppler spectra.
///
/// Values are written the way a cloud radar stores them on disk: time in
/// seconds since 2001-01-01, range in km above sea level and power in dB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub layout: DimLayout,
    pub n_ts: usize,
    pub n_rg: usize,
    pub n_vel: usize,
    pub start_since2001: f64,
    pub time_step: f64,
    pub range_start_km: f64,
    pub range_step_km: f64,
    pub nyquist: f64,
    pub noise_db: f64,
    pub peak_db: f64,
    pub jitter_db: f64,
    pub seed: u64,
    pub system: String,
    pub name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            layout: DimLayout::TimeRangeVel,
            n_ts: 4,
            n_rg: 16,
            n_vel: 64,
            start_since2001: 568_036_800.0,
            time_step: 30.0,
            range_start_km: 0.15,
            range_step_km: 0.03,
            nyquist: 10.0,
            noise_db: -40.0,
            peak_db: 5.0,
            jitter_db: 1.5,
            seed: 0,
            system: "SYNTH".to_string(),
            name: "VSpec".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Axis lengths actually used; implicit axes collapse to one sample.
    fn normalized_shape(&self) -> (usize, usize, usize) {
        let n_ts = if self.layout.has_time() { self.n_ts.max(1) } else { 1 };
        let n_rg = if self.layout.has_range() { self.n_rg.max(1) } else { 1 };
        (n_ts, n_rg, self.n_vel.max(2))
    }
}

fn build_spectra(config: &GeneratorConfig, vel: &Array1<f64>) -> anyhow::Result<Vec<f64>> {
    let (n_ts, n_rg, n_vel) = config.normalized_shape();
    let sample_count = n_ts
        .checked_mul(n_rg)
        .and_then(|n| n.checked_mul(n_vel))
        .context("overflow computing sample count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(sample_count);
    let width = (config.nyquist / 8.0).max(1e-3);

    for t in 0..n_ts {
        for r in 0..n_rg {
            let mean_doppler = -config.nyquist * 0.5 * (r as f64 + 1.0) / n_rg as f64
                + 0.1 * t as f64;
            for &v in vel.iter() {
                let shape = (-0.5 * ((v - mean_doppler) / width).powi(2)).exp();
                let linear = 10f64.powf(config.noise_db / 10.0)
                    + shape * 10f64.powf(config.peak_db / 10.0);
                let jitter = if config.jitter_db > 0.0 {
                    rng.gen_range(-config.jitter_db..config.jitter_db)
                } else {
                    0.0
                };
                samples.push(10.0 * linear.log10() + jitter);
            }
        }
    }

    Ok(samples)
}

fn axis_or_scalar(present: bool, values: Array1<f64>) -> ArrayD<f64> {
    if present {
        values.into_dyn()
    } else {
        DataContainer::scalar(values[0])
    }
}

pub fn build_container_from_config(config: &GeneratorConfig) -> anyhow::Result<DataContainer> {
    let (n_ts, n_rg, n_vel) = config.normalized_shape();
    let layout = config.layout;

    let ts: Array1<f64> = (0..n_ts)
        .map(|i| config.start_since2001 + i as f64 * config.time_step)
        .collect();
    let rg: Array1<f64> = (0..n_rg)
        .map(|i| config.range_start_km + i as f64 * config.range_step_km)
        .collect();
    let vel = Array::linspace(-config.nyquist, config.nyquist, n_vel);

    let samples = build_spectra(config, &vel)?;
    let shape: Vec<usize> = match layout {
        DimLayout::TimeRangeVel => vec![n_ts, n_rg, n_vel],
        DimLayout::TimeVel => vec![n_ts, n_vel],
        DimLayout::RangeVel => vec![n_rg, n_vel],
        DimLayout::Vel => vec![n_vel],
    };
    let var = ArrayD::from_shape_vec(shape, samples).context("shaping synthetic spectra")?;

    let mut data = DataContainer::new(
        layout,
        axis_or_scalar(layout.has_time(), ts),
        axis_or_scalar(layout.has_range(), rg),
        vel.into_dyn(),
        var,
    );
    data.system = config.system.clone();
    data.name = config.name.clone();
    data.rg_unit = "km".to_string();
    data.var_unit = "dBZ".to_string();
    data.var_lims = [config.noise_db, config.peak_db + config.jitter_db];
    data.colormap = "jet".to_string();
    Ok(data)
}

pub fn build_container(layout: DimLayout, seed: u64) -> anyhow::Result<DataContainer> {
    let config = GeneratorConfig {
        layout,
        seed,
        ..Default::default()
    };
    build_container_from_config(&config)
}
