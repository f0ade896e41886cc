use ndarray::{ArrayD, Axis, Slice};

use crate::prelude::{CoreError, CoreResult};

/// Owned copy of `array` with axes 0 and 1 exchanged, in standard layout.
pub fn swap_leading_axes<A: Clone>(array: &ArrayD<A>) -> CoreResult<ArrayD<A>> {
    require_rank(array, 2, "transpose")?;
    let mut view = array.view();
    view.swap_axes(0, 1);
    Ok(view.as_standard_layout().into_owned())
}

/// Swaps axes 0 and 1, then reverses the order along axis 2.
pub fn swap_leading_and_invert_third<A: Clone>(array: &ArrayD<A>) -> CoreResult<ArrayD<A>> {
    require_rank(array, 3, "transpose and invert")?;
    let mut view = array.view();
    view.swap_axes(0, 1);
    view.slice_axis_inplace(Axis(2), Slice::new(0, None, -1));
    Ok(view.as_standard_layout().into_owned())
}

fn require_rank<A>(array: &ArrayD<A>, rank: usize, op: &str) -> CoreResult<()> {
    if array.ndim() < rank {
        return Err(CoreError::ShapeMismatch(format!(
            "{} needs at least {} axes, got shape {:?}",
            op,
            rank,
            array.shape()
        )));
    }
    Ok(())
}
