use crate::prelude::{CoreError, CoreResult};

/// Index of the value closest to `value` in an ascending array such as a time
/// or range axis.
///
/// The right-hand neighbour only wins when it is strictly closer, so an exact
/// midpoint resolves to the lower index.
pub fn argnearest(sorted: &[f64], value: f64) -> CoreResult<usize> {
    if sorted.is_empty() {
        return Err(CoreError::EmptyArray("argnearest on empty axis".into()));
    }

    // left-side insertion point, as in a sorted search
    let insert = sorted.partition_point(|&v| v < value);
    if insert == 0 {
        return Ok(0);
    }

    let mut idx = insert - 1;
    if idx + 1 < sorted.len() && (sorted[idx] - value).abs() > (sorted[idx + 1] - value).abs() {
        idx += 1;
    }
    Ok(idx)
}

/// Value closest to `pivot` in an ascending array.
pub fn nearest(sorted: &[f64], pivot: f64) -> CoreResult<f64> {
    argnearest(sorted, pivot).map(|idx| sorted[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argnearest_picks_closest_neighbour() {
        let axis = [1.0, 3.0, 5.0, 9.0];
        assert_eq!(argnearest(&axis, 4.0).unwrap(), 1);
        assert_eq!(argnearest(&axis, 4.1).unwrap(), 2);
        assert_eq!(argnearest(&axis, 8.0).unwrap(), 3);
        assert_eq!(argnearest(&axis, 5.0).unwrap(), 2);
    }

    #[test]
    fn argnearest_clamps_outside_axis() {
        let axis = [1.0, 3.0, 5.0, 9.0];
        assert_eq!(argnearest(&axis, -10.0).unwrap(), 0);
        assert_eq!(argnearest(&axis, 1.0).unwrap(), 0);
        assert_eq!(argnearest(&axis, 100.0).unwrap(), 3);
    }

    #[test]
    fn argnearest_rejects_empty_axis() {
        assert!(matches!(
            argnearest(&[], 1.0),
            Err(CoreError::EmptyArray(_))
        ));
    }

    #[test]
    fn nearest_returns_value() {
        let axis = [100.0, 130.0, 160.0];
        assert_eq!(nearest(&axis, 141.0).unwrap(), 130.0);
        assert_eq!(nearest(&axis, 150.0).unwrap(), 160.0);
        assert_eq!(nearest(&[42.0], -1.0).unwrap(), 42.0);
    }
}
