use common::buffer3::cell_count;
use common::{AxisOrder, Buffer3};

use crate::error::{ExtractError, ExtractResult};

/// Immutable dense 3-D scalar field.
///
/// `order` describes how the caller laid out `values`; it is honored exactly
/// and carried through to every grid derived from the field.
#[derive(Debug, Clone)]
pub struct ScalarField {
    values: Buffer3<f64>,
}

impl ScalarField {
    pub fn new(dims: [usize; 3], order: AxisOrder, values: Vec<f64>) -> ExtractResult<Self> {
        check_shape(dims, values.len())?;
        Ok(Self {
            values: Buffer3::new(dims, order, values),
        })
    }

    pub fn from_f32(dims: [usize; 3], order: AxisOrder, values: &[f32]) -> ExtractResult<Self> {
        check_shape(dims, values.len())?;
        let values = values.iter().map(|&v| f64::from(v)).collect();
        Ok(Self {
            values: Buffer3::new(dims, order, values),
        })
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.values.dims()
    }

    #[inline]
    pub fn order(&self) -> AxisOrder {
        self.values.order()
    }

    #[inline]
    pub fn values(&self) -> &Buffer3<f64> {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn check_shape(dims: [usize; 3], actual: usize) -> ExtractResult<()> {
    let expected_cells = cell_count(dims).unwrap_or(usize::MAX);
    if expected_cells != actual {
        return Err(ExtractError::ShapeMismatch {
            expected: dims,
            expected_cells,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_shape() {
        let field = ScalarField::new([2, 3, 4], AxisOrder::ZFastest, vec![0.0; 24]).unwrap();
        assert_eq!(field.dims(), [2, 3, 4]);
        assert_eq!(field.len(), 24);
        assert_eq!(field.order(), AxisOrder::ZFastest);
    }

    #[test]
    fn rejects_mismatched_shape() {
        let err = ScalarField::new([2, 3, 4], AxisOrder::XFastest, vec![0.0; 23]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::ShapeMismatch {
                expected: [2, 3, 4],
                expected_cells: 24,
                actual: 23,
            }
        );
    }

    #[test]
    fn honors_supplied_layout() {
        // Same flat data, two layouts: value 1.0 lands on different coordinates.
        let mut values = vec![0.0f32; 8];
        values[1] = 1.0;
        let z_fast = ScalarField::from_f32([2, 2, 2], AxisOrder::ZFastest, &values).unwrap();
        let x_fast = ScalarField::from_f32([2, 2, 2], AxisOrder::XFastest, &values).unwrap();
        assert_eq!(z_fast.values()[[0, 0, 1]], 1.0);
        assert_eq!(x_fast.values()[[1, 0, 0]], 1.0);
    }
}
