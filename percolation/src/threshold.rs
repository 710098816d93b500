//! Threshold filter and grid padding.
//!
//! The sign of the threshold selects the tail: positive thresholds mark cells
//! above it, zero and negative thresholds mark cells below it.

use common::buffer3::cell_count;
use common::Buffer3;
use rayon::prelude::*;

use crate::error::{ExtractError, ExtractResult};
use crate::field::ScalarField;

#[inline]
pub fn is_occupied(value: f64, threshold: f64) -> bool {
    if threshold > 0.0 {
        value > threshold
    } else {
        value < threshold
    }
}

/// Parses one entry of a threshold list. NaN counts as invalid.
pub fn parse_threshold(raw: &str) -> ExtractResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(ExtractError::InvalidThreshold(raw.to_string())),
    }
}

/// Builds the boolean occupancy grid of `field` at `threshold`.
pub fn threshold_field(field: &ScalarField, threshold: f64) -> ExtractResult<Buffer3<bool>> {
    if threshold.is_nan() {
        return Err(ExtractError::InvalidThreshold(threshold.to_string()));
    }

    let dims = field.dims();
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(field.len())
        .map_err(|e| ExtractError::exhausted(dims, e))?;
    cells.par_extend(
        field
            .values()
            .par_iter()
            .map(|&value| is_occupied(value, threshold)),
    );

    Ok(Buffer3::new(dims, field.order(), cells))
}

/// Occupancy grid padded by one empty layer past the upper end of every axis.
///
/// Neighbor offsets of +1 never leave the grid for cells of the original
/// extent. Offsets of -1 at coordinate 0 still need an explicit check.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cells: Buffer3<bool>,
    original_dims: [usize; 3],
}

impl OccupancyGrid {
    /// Padded dimensions for an unpadded grid of `dims`.
    pub fn padded_dims(dims: [usize; 3]) -> ExtractResult<[usize; 3]> {
        let grow = |n: usize| {
            n.checked_add(1)
                .ok_or_else(|| ExtractError::ResourceExhaustion {
                    dims,
                    reason: "padded dimension overflows usize".to_string(),
                })
        };
        let padded = [grow(dims[0])?, grow(dims[1])?, grow(dims[2])?];
        if cell_count(padded).is_none() {
            return Err(ExtractError::ResourceExhaustion {
                dims: padded,
                reason: "cell count overflows usize".to_string(),
            });
        }
        Ok(padded)
    }

    pub fn pad(occupancy: &Buffer3<bool>) -> ExtractResult<Self> {
        let original_dims = occupancy.dims();
        let dims = Self::padded_dims(original_dims)?;
        let cells = occupancy
            .try_grow(dims, false)
            .map_err(|e| ExtractError::exhausted(dims, e))?;
        Ok(Self {
            cells,
            original_dims,
        })
    }

    #[inline]
    pub fn cells(&self) -> &Buffer3<bool> {
        &self.cells
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.cells.dims()
    }

    #[inline]
    pub fn original_dims(&self) -> [usize; 3] {
        self.original_dims
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AxisOrder;

    #[test]
    fn positive_threshold_selects_upper_tail() {
        assert!(is_occupied(5.0, 4.0));
        assert!(!is_occupied(4.0, 4.0));
        assert!(!is_occupied(-10.0, 4.0));
    }

    #[test]
    fn non_positive_threshold_selects_lower_tail() {
        assert!(is_occupied(-5.0, -4.0));
        assert!(!is_occupied(-4.0, -4.0));
        assert!(!is_occupied(10.0, -4.0));
        // zero is treated as a lower-tail threshold
        assert!(is_occupied(-0.5, 0.0));
        assert!(!is_occupied(0.5, 0.0));
    }

    #[test]
    fn nan_values_are_never_occupied() {
        assert!(!is_occupied(f64::NAN, 1.0));
        assert!(!is_occupied(f64::NAN, -1.0));
    }

    #[test]
    fn parse_threshold_entries() {
        assert_eq!(parse_threshold("47"), Ok(47.0));
        assert_eq!(parse_threshold(" -3.5 "), Ok(-3.5));
        assert_eq!(
            parse_threshold("abc"),
            Err(ExtractError::InvalidThreshold("abc".to_string()))
        );
        assert_eq!(
            parse_threshold("NaN"),
            Err(ExtractError::InvalidThreshold("NaN".to_string()))
        );
    }

    #[test]
    fn threshold_field_rejects_nan() {
        let field = ScalarField::new([1, 1, 1], AxisOrder::ZFastest, vec![1.0]).unwrap();
        assert!(matches!(
            threshold_field(&field, f64::NAN),
            Err(ExtractError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn threshold_field_keeps_shape_and_layout() {
        let values = vec![0.0, 2.0, -3.0, 5.0, 1.0, 0.5];
        let field = ScalarField::new([3, 2, 1], AxisOrder::XFastest, values).unwrap();

        let upper = threshold_field(&field, 1.0).unwrap();
        assert_eq!(upper.dims(), [3, 2, 1]);
        assert_eq!(upper.order(), AxisOrder::XFastest);
        assert_eq!(upper.cells(), &[false, true, false, true, false, false]);

        let lower = threshold_field(&field, -1.0).unwrap();
        assert_eq!(lower.cells(), &[false, false, true, false, false, false]);
    }

    #[test]
    fn padding_adds_one_empty_layer_per_axis() {
        let occupancy = Buffer3::new_filled([2, 3, 4], AxisOrder::ZFastest, true);
        let padded = OccupancyGrid::pad(&occupancy).unwrap();

        assert_eq!(padded.dims(), [3, 4, 5]);
        assert_eq!(padded.original_dims(), [2, 3, 4]);
        assert_eq!(padded.occupied_count(), 24);
        assert!(padded.cells()[[1, 2, 3]]);
        assert!(!padded.cells()[[2, 0, 0]]);
        assert!(!padded.cells()[[0, 3, 0]]);
        assert!(!padded.cells()[[0, 0, 4]]);
    }

    #[test]
    fn padded_dims_overflow_is_resource_exhaustion() {
        assert!(matches!(
            OccupancyGrid::padded_dims([usize::MAX, 1, 1]),
            Err(ExtractError::ResourceExhaustion { .. })
        ));
        assert!(matches!(
            OccupancyGrid::padded_dims([usize::MAX / 2, usize::MAX / 2, 1]),
            Err(ExtractError::ResourceExhaustion { .. })
        ));
    }
}
