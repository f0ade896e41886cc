use ndarray::ArrayD;

/// Linear power to dB. Non-positive and NaN input yields NaN instead of panicking.
pub fn lin2z(value: f64) -> f64 {
    if value > 0.0 {
        10.0 * value.log10()
    } else {
        f64::NAN
    }
}

/// dB to linear power.
pub fn z2lin(value: f64) -> f64 {
    10f64.powf(value / 10.0)
}

pub fn lin2z_array(values: &ArrayD<f64>) -> ArrayD<f64> {
    values.mapv(lin2z)
}

pub fn z2lin_array(values: &ArrayD<f64>) -> ArrayD<f64> {
    values.mapv(z2lin)
}
