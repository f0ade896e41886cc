use log::debug;
use ndarray::{arr0, ArrayD};

use crate::convert::axes::{swap_leading_and_invert_third, swap_leading_axes};
use crate::convert::conversion::Conversion;
use crate::convert::params::ConversionParams;
use crate::epoch::{midnight_ts, SECONDS_1970_TO_19691231T23, SECONDS_1970_TO_2001};
use crate::math::db::{lin2z_array, z2lin_array};
use crate::math::masked::MaskedArray;
use crate::prelude::{CoreError, CoreResult};

pub type ValueFn = Box<dyn Fn(&ArrayD<f64>) -> CoreResult<ArrayD<f64>> + Send + Sync>;
pub type MaskFn = Box<dyn Fn(&ArrayD<bool>) -> CoreResult<ArrayD<bool>> + Send + Sync>;

/// Matched value/mask transform pair produced by [`resolve`].
pub struct Converter {
    pub conversion: Conversion,
    pub value: ValueFn,
    pub mask: MaskFn,
}

impl Converter {
    pub fn into_pair(self) -> (ValueFn, MaskFn) {
        (self.value, self.mask)
    }

    pub fn convert_scalar(&self, value: f64) -> CoreResult<f64> {
        let converted = (self.value)(&arr0(value).into_dyn())?;
        converted
            .iter()
            .next()
            .copied()
            .ok_or_else(|| CoreError::ShapeMismatch("scalar conversion produced no value".into()))
    }

    /// Runs both transforms and masks every value that became non-finite.
    pub fn apply_masked(&self, input: &MaskedArray) -> CoreResult<MaskedArray> {
        let data = (self.value)(&input.data)?;
        let mask = (self.mask)(&input.mask)?;
        let mut converted = MaskedArray::new(data, mask)?;
        let invalid = converted.mask_invalid();
        if invalid > 0 {
            debug!("{} masked {} non-finite values", self.conversion, invalid);
        }
        Ok(converted)
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("conversion", &self.conversion)
            .finish_non_exhaustive()
    }
}

/// Looks up `name` and builds its transform pair.
///
/// Unknown names fail here. Required parameters are captured now but only
/// checked when the value transform runs, so a missing `altitude` surfaces
/// as [`CoreError::MissingParameter`] from the call, never as a silent default.
pub fn resolve(name: &str, params: &ConversionParams) -> CoreResult<Converter> {
    let conversion: Conversion = name.parse()?;
    debug!("resolved converter {} with {} params", conversion, params.iter().count());
    Ok(build(conversion, params))
}

fn build(conversion: Conversion, params: &ConversionParams) -> Converter {
    let (value, mask): (ValueFn, MaskFn) = match conversion {
        Conversion::Since20010101 => (offset(SECONDS_1970_TO_2001), identity_mask()),
        Conversion::Unix | Conversion::Identity => (identity_value(), identity_mask()),
        Conversion::Since19691231 => (offset(SECONDS_1970_TO_19691231T23), identity_mask()),
        Conversion::BeginOfDay => {
            let params = params.clone();
            let value: ValueFn = Box::new(move |hours: &ArrayD<f64>| {
                let day_start = midnight_ts(params.date(conversion, "ncD")?);
                Ok(hours.mapv(|h| h * 3600.0 + day_start))
            });
            (value, identity_mask())
        }
        Conversion::KmToM => (elementwise(|x| x * 1000.0), identity_mask()),
        Conversion::SeaLevelToRange => {
            let params = params.clone();
            let value: ValueFn = Box::new(move |heights: &ArrayD<f64>| {
                let altitude = params.number(conversion, "altitude")?;
                Ok(heights.mapv(|h| h - altitude))
            });
            (value, identity_mask())
        }
        Conversion::DbToLinear => (Box::new(|x: &ArrayD<f64>| Ok(z2lin_array(x))), identity_mask()),
        Conversion::LinearToDb => (Box::new(|x: &ArrayD<f64>| Ok(lin2z_array(x))), identity_mask()),
        Conversion::SwitchSign => (elementwise(|x| -x), identity_mask()),
        Conversion::MiraAzimuthOffset => {
            let params = params.clone();
            let value: ValueFn = Box::new(move |azimuth: &ArrayD<f64>| {
                let zero = params.number(conversion, "mira_azi_zero")?;
                Ok(azimuth.mapv(|a| (a + zero).rem_euclid(360.0)))
            });
            (value, identity_mask())
        }
        Conversion::TransposeDim => (
            Box::new(|x: &ArrayD<f64>| swap_leading_axes(x)),
            Box::new(|m: &ArrayD<bool>| swap_leading_axes(m)),
        ),
        Conversion::TransposeDimInvertThird => (
            Box::new(|x: &ArrayD<f64>| swap_leading_and_invert_third(x)),
            Box::new(|m: &ArrayD<bool>| swap_leading_and_invert_third(m)),
        ),
        Conversion::DivideBy2 => (divide_by(2.0), identity_mask()),
    };

    Converter {
        conversion,
        value,
        mask,
    }
}

fn identity_value() -> ValueFn {
    Box::new(|x: &ArrayD<f64>| Ok(x.clone()))
}

fn identity_mask() -> MaskFn {
    Box::new(|m: &ArrayD<bool>| Ok(m.clone()))
}

fn elementwise(f: fn(f64) -> f64) -> ValueFn {
    Box::new(move |x: &ArrayD<f64>| Ok(x.mapv(f)))
}

fn offset(seconds: f64) -> ValueFn {
    Box::new(move |x: &ArrayD<f64>| Ok(x.mapv(|v| v + seconds)))
}

fn divide_by(divisor: f64) -> ValueFn {
    Box::new(move |x: &ArrayD<f64>| Ok(x.mapv(|v| v / divisor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::{arr1, arr2, Array3};

    fn scalar(name: &str, params: &ConversionParams, x: f64) -> f64 {
        resolve(name, params).unwrap().convert_scalar(x).unwrap()
    }

    #[test]
    fn closed_form_results() {
        let none = ConversionParams::new();
        assert_eq!(scalar("km2m", &none, 1.0), 1000.0);
        assert_eq!(scalar("z2lin", &none, 0.0), 1.0);
        assert_eq!(scalar("lin2z", &none, 1.0), 0.0);
        assert_eq!(scalar("switchsign", &none, 2.5), -2.5);
        assert_eq!(scalar("divideby2", &none, 7.0), 3.5);
        assert_eq!(scalar("since20010101", &none, 0.0), 978_307_200.0);
        assert_eq!(scalar("since19691231", &none, 3600.0), 0.0);
    }

    #[test]
    fn identity_conversions_leave_values_and_mask() {
        let values = arr2(&[[1.5, -2.0], [f64::MAX, 0.0]]).into_dyn();
        let mask = arr2(&[[true, false], [false, true]]).into_dyn();
        for name in ["unix", "none"] {
            let (value_fn, mask_fn) = resolve(name, &ConversionParams::new()).unwrap().into_pair();
            assert_eq!(value_fn(&values).unwrap(), values);
            assert_eq!(mask_fn(&mask).unwrap(), mask);
        }
    }

    #[test]
    fn mira_azimuth_wraps_at_360() {
        let params = ConversionParams::new().with("mira_azi_zero", 10.0);
        assert_eq!(scalar("mira_azi_offset", &params, 355.0), 5.0);
        assert_eq!(scalar("mira_azi_offset", &params, 20.0), 30.0);

        let negative = ConversionParams::new().with("mira_azi_zero", -30.0);
        assert_eq!(scalar("mira_azi_offset", &negative, 10.0), 340.0);
    }

    #[test]
    fn sealevel2range_subtracts_altitude() {
        let params = ConversionParams::new().with("altitude", 120.0);
        let converter = resolve("sealevel2range", &params).unwrap();
        let out = (converter.value)(&arr1(&[150.0, 1120.0]).into_dyn()).unwrap();
        assert_eq!(out, arr1(&[30.0, 1000.0]).into_dyn());
    }

    #[test]
    fn beginofday_anchors_hours_to_reference_date() {
        let day = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let params = ConversionParams::new().with("ncD", day);
        assert_eq!(scalar("beginofday", &params, 1.5), 978_307_200.0 + 5_400.0);
    }

    #[test]
    fn missing_parameter_fails_at_call_time() {
        let converter = resolve("sealevel2range", &ConversionParams::new()).unwrap();
        let err = (converter.value)(&arr1(&[1.0]).into_dyn()).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingParameter {
                converter: "sealevel2range",
                param: "altitude"
            }
        );
        assert!(resolve("beginofday", &ConversionParams::new())
            .unwrap()
            .convert_scalar(1.0)
            .is_err());
    }

    #[test]
    fn unknown_name_fails_fast() {
        assert_eq!(
            resolve("bogus", &ConversionParams::new()).unwrap_err(),
            CoreError::UnknownConverter("bogus".into())
        );
    }

    #[test]
    fn transposing_conversions_move_the_mask_too() {
        let values = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| (i * 100 + j * 10 + k) as f64).into_dyn();
        let mut mask = ArrayD::from_elem(values.raw_dim(), false);
        mask[[1, 2, 0]] = true;

        let converter = resolve("transposedim+invert3rd", &ConversionParams::new()).unwrap();
        let out = converter
            .apply_masked(&MaskedArray::new(values, mask).unwrap())
            .unwrap();
        assert_eq!(out.data.shape(), &[3, 2, 4]);
        assert_eq!(out.mask.shape(), &[3, 2, 4]);
        assert!(out.mask[[2, 1, 3]]);
        assert_eq!(out.data[[2, 1, 3]], 120.0);
        assert_eq!(out.masked_count(), 1);

        let converter = resolve("transposedim", &ConversionParams::new()).unwrap();
        let flat = MaskedArray::unmasked(arr2(&[[1.0, 2.0, 3.0]]).into_dyn());
        let out = converter.apply_masked(&flat).unwrap();
        assert_eq!(out.data.shape(), &[3, 1]);
        assert_eq!(out.mask.shape(), &[3, 1]);
    }

    #[test]
    fn apply_masked_marks_invalid_db_values() {
        let converter = resolve("lin2z", &ConversionParams::new()).unwrap();
        let out = converter
            .apply_masked(&MaskedArray::unmasked(arr1(&[10.0, 0.0]).into_dyn()))
            .unwrap();
        assert_eq!(out.mask, arr1(&[false, true]).into_dyn());
        assert!((out.data[[0]] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn resolving_twice_gives_equivalent_functions() {
        let params = ConversionParams::new().with("altitude", 7.0);
        let a = resolve("sealevel2range", &params).unwrap();
        let b = resolve("sealevel2range", &params).unwrap();
        let input = arr1(&[10.0, 20.0]).into_dyn();
        assert_eq!((a.value)(&input).unwrap(), (b.value)(&input).unwrap());
    }
}
