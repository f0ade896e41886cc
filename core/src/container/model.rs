use std::fmt;

use ndarray::{arr0, ArrayD};
use serde::{Deserialize, Serialize};

use crate::convert::Converter;
use crate::math::MaskedArray;
use crate::prelude::{CoreError, CoreResult};

/// The four axis layouts an ingested measurement may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimLayout {
    TimeRangeVel,
    TimeVel,
    RangeVel,
    Vel,
}

impl DimLayout {
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> CoreResult<Self> {
        let names: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
        match names.as_slice() {
            ["time", "range", "vel"] => Ok(DimLayout::TimeRangeVel),
            ["time", "vel"] => Ok(DimLayout::TimeVel),
            ["range", "vel"] => Ok(DimLayout::RangeVel),
            ["vel"] => Ok(DimLayout::Vel),
            _ => Err(CoreError::UnsupportedLayout(
                names.iter().map(|s| s.to_string()).collect(),
            )),
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            DimLayout::TimeRangeVel => &["time", "range", "vel"],
            DimLayout::TimeVel => &["time", "vel"],
            DimLayout::RangeVel => &["range", "vel"],
            DimLayout::Vel => &["vel"],
        }
    }

    pub fn has_time(self) -> bool {
        matches!(self, DimLayout::TimeRangeVel | DimLayout::TimeVel)
    }

    pub fn has_range(self) -> bool {
        matches!(self, DimLayout::TimeRangeVel | DimLayout::RangeVel)
    }
}

/// Container fields a converter can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Ts,
    Rg,
    Vel,
    Var,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Ts => "ts",
            Field::Rg => "rg",
            Field::Vel => "vel",
            Field::Var => "var",
        };
        f.write_str(name)
    }
}

/// Self-describing measurement record passed between ingestion, conversion
/// and analysis.
///
/// Axes that `dimlabel` does not list are implicit; their coordinate arrays
/// hold a single value (often a 0-d array). `var` and `mask` always share a
/// shape and hold `n_ts * n_rg * n_vel` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataContainer {
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub name: String,
    pub dimlabel: Vec<String>,
    pub ts: ArrayD<f64>,
    pub rg: ArrayD<f64>,
    pub vel: ArrayD<f64>,
    pub var: ArrayD<f64>,
    pub mask: ArrayD<bool>,
    #[serde(default)]
    pub rg_unit: String,
    #[serde(default)]
    pub var_unit: String,
    #[serde(default)]
    pub var_lims: [f64; 2],
    #[serde(default)]
    pub colormap: String,
    #[serde(default)]
    pub filename: Vec<String>,
    #[serde(default)]
    pub paraminfo: serde_json::Value,
}

impl DataContainer {
    /// Container with nothing masked and empty metadata.
    pub fn new(
        layout: DimLayout,
        ts: ArrayD<f64>,
        rg: ArrayD<f64>,
        vel: ArrayD<f64>,
        var: ArrayD<f64>,
    ) -> Self {
        let mask = ArrayD::from_elem(var.raw_dim(), false);
        Self {
            system: String::new(),
            name: String::new(),
            dimlabel: layout.labels().iter().map(|s| s.to_string()).collect(),
            ts,
            rg,
            vel,
            var,
            mask,
            rg_unit: String::new(),
            var_unit: String::new(),
            var_lims: [0.0, 0.0],
            colormap: String::new(),
            filename: Vec::new(),
            paraminfo: serde_json::Value::Null,
        }
    }

    /// Coordinate for an implicit axis.
    pub fn scalar(value: f64) -> ArrayD<f64> {
        arr0(value).into_dyn()
    }

    pub fn layout(&self) -> CoreResult<DimLayout> {
        DimLayout::from_labels(self.dimlabel.as_slice())
    }

    pub fn n_ts(&self) -> usize {
        self.ts.len()
    }

    pub fn n_rg(&self) -> usize {
        self.rg.len()
    }

    pub fn n_vel(&self) -> usize {
        self.vel.len()
    }

    pub fn masked_var(&self) -> CoreResult<MaskedArray> {
        MaskedArray::new(self.var.clone(), self.mask.clone())
    }

    pub fn set_masked_var(&mut self, values: MaskedArray) {
        self.var = values.data;
        self.mask = values.mask;
    }

    /// Applies `converter` to one field. Coordinate axes only see the value
    /// transform; `var` is converted together with its mask.
    pub fn apply(&mut self, field: Field, converter: &Converter) -> CoreResult<()> {
        match field {
            Field::Ts => self.ts = (converter.value)(&self.ts)?,
            Field::Rg => self.rg = (converter.value)(&self.rg)?,
            Field::Vel => self.vel = (converter.value)(&self.vel)?,
            Field::Var => {
                let converted = converter.apply_masked(&self.masked_var()?)?;
                self.set_masked_var(converted);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{resolve, ConversionParams};
    use ndarray::{arr1, arr2};

    #[test]
    fn layout_accepts_canonical_patterns_only() {
        assert_eq!(
            DimLayout::from_labels(&["time", "range", "vel"]).unwrap(),
            DimLayout::TimeRangeVel
        );
        assert_eq!(DimLayout::from_labels(&["vel"]).unwrap(), DimLayout::Vel);
        assert_eq!(
            DimLayout::from_labels(&["bad", "label"]).unwrap_err(),
            CoreError::UnsupportedLayout(vec!["bad".into(), "label".into()])
        );
        assert!(DimLayout::from_labels(&["range", "time", "vel"]).is_err());
    }

    #[test]
    fn layout_reports_present_axes() {
        assert!(DimLayout::TimeVel.has_time());
        assert!(!DimLayout::TimeVel.has_range());
        assert!(DimLayout::RangeVel.has_range());
        assert!(!DimLayout::Vel.has_time());
    }

    #[test]
    fn apply_converts_axis_and_var_with_mask() {
        let mut data = DataContainer::new(
            DimLayout::RangeVel,
            DataContainer::scalar(0.0),
            arr1(&[1.0, 2.0]).into_dyn(),
            arr1(&[-1.0, 1.0]).into_dyn(),
            arr2(&[[1.0, 10.0], [0.0, 100.0]]).into_dyn(),
        );
        let params = ConversionParams::new();

        data.apply(Field::Rg, &resolve("km2m", &params).unwrap()).unwrap();
        assert_eq!(data.rg, arr1(&[1000.0, 2000.0]).into_dyn());

        data.apply(Field::Var, &resolve("lin2z", &params).unwrap()).unwrap();
        assert_eq!(data.mask, arr2(&[[false, false], [true, false]]).into_dyn());

        data.apply(Field::Var, &resolve("transposedim", &params).unwrap())
            .unwrap();
        assert_eq!(data.mask, arr2(&[[false, true], [false, false]]).into_dyn());
    }

    #[test]
    fn container_round_trips_through_json() {
        let data = DataContainer::new(
            DimLayout::Vel,
            DataContainer::scalar(1.5e9),
            DataContainer::scalar(300.0),
            arr1(&[-1.0, 0.0, 1.0]).into_dyn(),
            arr1(&[0.1, 0.2, 0.3]).into_dyn(),
        );
        let text = serde_json::to_string(&data).unwrap();
        let back: DataContainer = serde_json::from_str(&text).unwrap();
        assert_eq!(back, data);
    }
}
