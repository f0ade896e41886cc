use log::warn;
use ndarray::{ArrayD, Zip};
use serde::{Deserialize, Serialize};

use crate::math::db::lin2z_array;
use crate::prelude::{CoreError, CoreResult};

/// Values paired with a validity mask of identical shape; `true` marks an
/// invalid or missing sample. Masked payloads carry no meaning and are often NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedArray {
    pub data: ArrayD<f64>,
    pub mask: ArrayD<bool>,
}

impl MaskedArray {
    pub fn new(data: ArrayD<f64>, mask: ArrayD<bool>) -> CoreResult<Self> {
        if data.shape() != mask.shape() {
            return Err(CoreError::ShapeMismatch(format!(
                "values {:?} vs mask {:?}",
                data.shape(),
                mask.shape()
            )));
        }
        Ok(Self { data, mask })
    }

    /// Wraps values with nothing masked.
    pub fn unmasked(data: ArrayD<f64>) -> Self {
        let mask = ArrayD::from_elem(data.raw_dim(), false);
        Self { data, mask }
    }

    /// Marks every non-finite value as masked and returns how many were newly masked.
    pub fn mask_invalid(&mut self) -> usize {
        let mut newly_masked = 0;
        Zip::from(&mut self.mask)
            .and(&self.data)
            .for_each(|masked, &value| {
                if !*masked && !value.is_finite() {
                    *masked = true;
                    newly_masked += 1;
                }
            });
        newly_masked
    }

    pub fn masked_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Unmasked values in logical (row-major) order.
    pub fn compressed(&self) -> Vec<f64> {
        self.data
            .iter()
            .zip(self.mask.iter())
            .filter(|&(_, &masked)| !masked)
            .map(|(&value, _)| value)
            .collect()
    }

    pub fn filled(&self, fill: f64) -> ArrayD<f64> {
        fill_with(&self.data, &self.mask, fill)
    }
}

/// Copy of `values` with every masked element replaced by `fill`.
pub fn fill_with(values: &ArrayD<f64>, mask: &ArrayD<bool>, fill: f64) -> ArrayD<f64> {
    let mut filled = values.clone();
    Zip::from(&mut filled)
        .and_broadcast(mask)
        .for_each(|value, &masked| {
            if masked {
                *value = fill;
            }
        });
    filled
}

/// dB conversion that folds numerically invalid results into the mask.
pub fn lin2z_masked(input: &MaskedArray) -> MaskedArray {
    let mut converted = MaskedArray {
        data: lin2z_array(&input.data),
        mask: input.mask.clone(),
    };
    let invalid = converted.mask_invalid();
    if invalid > 0 {
        warn!("lin2z masked {} non-positive or non-finite samples", invalid);
    }
    converted
}
