use log::debug;
use ndarray::{Array1, Array3, ArrayD, Ix3};

use crate::container::model::{DataContainer, DimLayout};
use crate::prelude::{CoreError, CoreResult};

/// Spectra expanded to the fixed `(time, range, velocity)` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSpectra {
    pub ts: Array1<f64>,
    pub rg: Array1<f64>,
    pub var: Array3<f64>,
    pub mask: Array3<bool>,
}

impl CanonicalSpectra {
    pub fn shape(&self) -> (usize, usize, usize) {
        self.var.dim()
    }

    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>, Array3<f64>) {
        (self.ts, self.rg, self.var)
    }
}

/// Reshapes time, range, spectra and mask of `data` to rank-3 canonical form.
///
/// Implicit axes become singleton axes; values keep their row-major order.
/// The result never aliases the input container.
pub fn canonicalize(data: &DataContainer) -> CoreResult<CanonicalSpectra> {
    let layout = data.layout()?;
    let shape = (data.n_ts(), data.n_rg(), data.n_vel());
    let expected = shape.0 * shape.1 * shape.2;

    for (what, count) in [("var", data.var.len()), ("mask", data.mask.len())] {
        if count != expected {
            return Err(CoreError::ShapeMismatch(format!(
                "{} holds {} values, axes {:?} need {}",
                what, count, shape, expected
            )));
        }
    }

    let ts = flatten_axis(&data.ts);
    let rg = flatten_axis(&data.rg);
    let (var, mask) = match layout {
        DimLayout::TimeRangeVel => (
            already_canonical(&data.var, shape)?,
            already_canonical(&data.mask, shape)?,
        ),
        DimLayout::TimeVel | DimLayout::RangeVel | DimLayout::Vel => {
            (expand(&data.var, shape)?, expand(&data.mask, shape)?)
        }
    };

    debug!(
        "canonicalized {:?} {:?} -> {:?}",
        layout,
        data.var.shape(),
        var.shape()
    );
    Ok(CanonicalSpectra { ts, rg, var, mask })
}

fn flatten_axis(axis: &ArrayD<f64>) -> Array1<f64> {
    axis.iter().copied().collect()
}

fn already_canonical<A: Clone>(
    values: &ArrayD<A>,
    shape: (usize, usize, usize),
) -> CoreResult<Array3<A>> {
    let cube = values
        .to_owned()
        .into_dimensionality::<Ix3>()
        .map_err(|_| {
            CoreError::ShapeMismatch(format!(
                "[time, range, vel] data must be rank 3, got {:?}",
                values.shape()
            ))
        })?;
    if cube.dim() != shape {
        return Err(CoreError::ShapeMismatch(format!(
            "data shape {:?} does not match axes {:?}",
            cube.shape(),
            shape
        )));
    }
    Ok(cube)
}

fn expand<A: Clone>(values: &ArrayD<A>, shape: (usize, usize, usize)) -> CoreResult<Array3<A>> {
    let flat: Vec<A> = values.iter().cloned().collect();
    Array3::from_shape_vec(shape, flat).map_err(|e| CoreError::ShapeMismatch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array};

    fn container(layout: DimLayout, ts: ArrayD<f64>, rg: ArrayD<f64>, n_vel: usize, var: ArrayD<f64>) -> DataContainer {
        let vel = Array::linspace(-1.0, 1.0, n_vel).into_dyn();
        DataContainer::new(layout, ts, rg, vel, var)
    }

    #[test]
    fn velocity_only_becomes_singleton_cube() {
        let data = container(
            DimLayout::Vel,
            DataContainer::scalar(1.0e9),
            DataContainer::scalar(500.0),
            4,
            arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn(),
        );
        let out = canonicalize(&data).unwrap();
        assert_eq!(out.shape(), (1, 1, 4));
        assert_eq!(out.ts, arr1(&[1.0e9]));
        assert_eq!(out.rg, arr1(&[500.0]));
        assert_eq!(out.var[[0, 0, 3]], 4.0);
        assert_eq!(out.mask.dim(), (1, 1, 4));
    }

    #[test]
    fn time_vel_gains_range_axis() {
        let data = container(
            DimLayout::TimeVel,
            arr1(&[0.0, 30.0, 60.0]).into_dyn(),
            DataContainer::scalar(150.0),
            2,
            arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).into_dyn(),
        );
        let out = canonicalize(&data).unwrap();
        assert_eq!(out.shape(), (3, 1, 2));
        assert_eq!(out.var[[2, 0, 1]], 6.0);
        assert_eq!(out.rg.len(), 1);
    }

    #[test]
    fn range_vel_gains_time_axis() {
        let mut data = container(
            DimLayout::RangeVel,
            DataContainer::scalar(0.0),
            arr1(&[100.0, 200.0]).into_dyn(),
            3,
            arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn(),
        );
        data.mask[[1, 2]] = true;
        let out = canonicalize(&data).unwrap();
        assert_eq!(out.shape(), (1, 2, 3));
        assert_eq!(out.var[[0, 1, 0]], 4.0);
        assert!(out.mask[[0, 1, 2]]);
        assert_eq!(out.ts.len(), 1);
    }

    #[test]
    fn canonical_input_is_copied_not_aliased() {
        let var = Array::from_shape_fn((2, 3, 2), |(i, j, k)| (i * 6 + j * 2 + k) as f64).into_dyn();
        let data = container(
            DimLayout::TimeRangeVel,
            arr1(&[0.0, 1.0]).into_dyn(),
            arr1(&[10.0, 20.0, 30.0]).into_dyn(),
            2,
            var.clone(),
        );
        let (ts, rg, mut out) = canonicalize(&data).unwrap().into_parts();
        assert_eq!(out.clone().into_dyn(), var);
        assert_eq!(ts.into_dyn(), data.ts);
        assert_eq!(rg.into_dyn(), data.rg);

        out[[0, 0, 0]] = -1.0;
        assert_eq!(data.var[[0, 0, 0]], 0.0);
    }

    #[test]
    fn unknown_dimlabel_is_a_format_error() {
        let mut data = container(
            DimLayout::Vel,
            DataContainer::scalar(0.0),
            DataContainer::scalar(0.0),
            2,
            arr1(&[1.0, 2.0]).into_dyn(),
        );
        data.dimlabel = vec!["bad".into(), "label".into()];
        assert!(matches!(
            canonicalize(&data),
            Err(CoreError::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn element_count_must_match_axes() {
        let data = container(
            DimLayout::TimeVel,
            arr1(&[0.0, 1.0]).into_dyn(),
            arr1(&[1.0, 2.0]).into_dyn(),
            2,
            arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(),
        );
        assert!(matches!(canonicalize(&data), Err(CoreError::ShapeMismatch(_))));
    }

    #[test]
    fn transposed_cube_is_rejected() {
        let var = ArrayD::zeros(vec![3, 2, 2]);
        let data = container(
            DimLayout::TimeRangeVel,
            arr1(&[0.0, 1.0]).into_dyn(),
            arr1(&[10.0, 20.0, 30.0]).into_dyn(),
            2,
            var,
        );
        assert!(matches!(canonicalize(&data), Err(CoreError::ShapeMismatch(_))));
    }
}
