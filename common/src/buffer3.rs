use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Memory layout of a dense 3-D buffer.
///
/// The flat storage order is also the scan order used by anything that walks
/// the buffer front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisOrder {
    /// Row-major: `index = (x * ny + y) * nz + z`, z varies fastest.
    #[default]
    ZFastest,
    /// Column-major: `index = (z * ny + y) * nx + x`, x varies fastest.
    XFastest,
}

impl AxisOrder {
    #[inline]
    pub fn flat_index(self, dims: [usize; 3], [x, y, z]: [usize; 3]) -> usize {
        let [nx, ny, nz] = dims;
        match self {
            AxisOrder::ZFastest => (x * ny + y) * nz + z,
            AxisOrder::XFastest => (z * ny + y) * nx + x,
        }
    }

    #[inline]
    pub fn coords(self, dims: [usize; 3], idx: usize) -> [usize; 3] {
        let [nx, ny, nz] = dims;
        match self {
            AxisOrder::ZFastest => {
                let z = idx % nz;
                let rest = idx / nz;
                [rest / ny, rest % ny, z]
            }
            AxisOrder::XFastest => {
                let x = idx % nx;
                let rest = idx / nx;
                [x, rest % ny, rest / ny]
            }
        }
    }
}

/// Product of the three dimensions, `None` on overflow.
pub fn cell_count(dims: [usize; 3]) -> Option<usize> {
    dims[0].checked_mul(dims[1])?.checked_mul(dims[2])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer3<T> {
    cells: Vec<T>,
    dims: [usize; 3],
    order: AxisOrder,
}

impl<T> Buffer3<T> {
    pub fn new(dims: [usize; 3], order: AxisOrder, cells: Vec<T>) -> Self {
        assert_eq!(
            Some(cells.len()),
            cell_count(dims),
            "cells length must equal nx * ny * nz"
        );
        Self { cells, dims, order }
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn order(&self) -> AxisOrder {
        self.order
    }

    #[inline]
    pub fn index(&self, coords: [usize; 3]) -> usize {
        self.order.flat_index(self.dims, coords)
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> [usize; 3] {
        self.order.coords(self.dims, idx)
    }

    #[inline]
    pub fn contains(&self, coords: [usize; 3]) -> bool {
        coords[0] < self.dims[0] && coords[1] < self.dims[1] && coords[2] < self.dims[2]
    }

    #[inline]
    pub fn get(&self, coords: [usize; 3]) -> &T {
        debug_assert!(self.contains(coords));
        &self.cells[self.index(coords)]
    }

    #[inline]
    pub fn get_mut(&mut self, coords: [usize; 3]) -> &mut T {
        debug_assert!(self.contains(coords));
        let idx = self.index(coords);
        &mut self.cells[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.cells.iter()
    }
}

impl<T: Clone> Buffer3<T> {
    pub fn new_filled(dims: [usize; 3], order: AxisOrder, value: T) -> Self {
        let len = cell_count(dims).expect("buffer dimensions overflow usize");
        Self {
            cells: vec![value; len],
            dims,
            order,
        }
    }

    /// Like [`Buffer3::new_filled`], but reports allocation failure instead of aborting.
    pub fn try_new_filled(
        dims: [usize; 3],
        order: AxisOrder,
        value: T,
    ) -> Result<Self, TryReserveError> {
        let len = match cell_count(dims) {
            Some(len) => len,
            // An impossible reservation yields a CapacityOverflow error.
            None => usize::MAX,
        };
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.resize(len, value);
        Ok(Self { cells, dims, order })
    }

    /// Copies this buffer into a larger one of `dims`, filling the rest with `fill`.
    ///
    /// Coordinates are preserved, so the new cells sit past the upper end of each axis.
    pub fn try_grow(&self, dims: [usize; 3], fill: T) -> Result<Self, TryReserveError> {
        assert!(
            dims.iter().zip(self.dims.iter()).all(|(new, old)| new >= old),
            "grown dimensions must not be smaller"
        );
        let mut grown = Self::try_new_filled(dims, self.order, fill)?;
        for (idx, value) in self.cells.iter().enumerate() {
            let coords = self.coords(idx);
            *grown.get_mut(coords) = value.clone();
        }
        Ok(grown)
    }

    /// Copies the `[0, dims)` corner of this buffer into a new buffer.
    pub fn try_crop(&self, dims: [usize; 3]) -> Result<Self, TryReserveError> {
        assert!(
            dims.iter().zip(self.dims.iter()).all(|(new, old)| new <= old),
            "cropped dimensions must not be larger"
        );
        let len = cell_count(dims).unwrap_or(usize::MAX);
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        for idx in 0..len {
            let coords = self.order.coords(dims, idx);
            cells.push(self.get(coords).clone());
        }
        Ok(Self {
            cells,
            dims,
            order: self.order,
        })
    }
}

impl<T> Index<[usize; 3]> for Buffer3<T> {
    type Output = T;

    #[inline]
    fn index(&self, coords: [usize; 3]) -> &Self::Output {
        &self.cells[self.order.flat_index(self.dims, coords)]
    }
}

impl<T> IndexMut<[usize; 3]> for Buffer3<T> {
    #[inline]
    fn index_mut(&mut self, coords: [usize; 3]) -> &mut Self::Output {
        let idx = self.order.flat_index(self.dims, coords);
        &mut self.cells[idx]
    }
}

impl<T> Index<usize> for Buffer3<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.cells[idx]
    }
}

impl<T> IndexMut<usize> for Buffer3<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.cells[idx]
    }
}

impl<T> Deref for Buffer3<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl<T> DerefMut for Buffer3<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cells
    }
}

impl<'a, T> IntoIterator for &'a Buffer3<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_dimensions() {
        let buf = Buffer3::new([2, 3, 1], AxisOrder::ZFastest, vec![0u8; 6]);
        assert_eq!(buf.dims(), [2, 3, 1]);
        assert_eq!(buf.len(), 6);
        assert!(!buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "cells length must equal nx * ny * nz")]
    fn test_new_panics_on_size_mismatch() {
        Buffer3::new([2, 2, 2], AxisOrder::ZFastest, vec![0u8; 7]);
    }

    #[test]
    fn test_z_fastest_layout() {
        // dims 2x2x3: index = (x * 2 + y) * 3 + z
        let buf = Buffer3::new([2, 2, 3], AxisOrder::ZFastest, (0..12).collect());
        assert_eq!(buf[[0, 0, 1]], 1);
        assert_eq!(buf[[0, 1, 0]], 3);
        assert_eq!(buf[[1, 0, 0]], 6);
        assert_eq!(buf[[1, 1, 2]], 11);
    }

    #[test]
    fn test_x_fastest_layout() {
        // dims 3x2x2: index = (z * 2 + y) * 3 + x
        let buf = Buffer3::new([3, 2, 2], AxisOrder::XFastest, (0..12).collect());
        assert_eq!(buf[[1, 0, 0]], 1);
        assert_eq!(buf[[0, 1, 0]], 3);
        assert_eq!(buf[[0, 0, 1]], 6);
        assert_eq!(buf[[2, 1, 1]], 11);
    }

    #[test]
    fn test_coords_inverts_index() {
        for order in [AxisOrder::ZFastest, AxisOrder::XFastest] {
            let buf = Buffer3::new_filled([3, 4, 5], order, 0u8);
            for idx in 0..buf.len() {
                assert_eq!(buf.index(buf.coords(idx)), idx);
            }
        }
    }

    #[test]
    fn test_grow_keeps_coordinates_and_fills_upper_layer() {
        let buf = Buffer3::new([2, 1, 2], AxisOrder::XFastest, vec![1, 2, 3, 4]);
        let grown = buf.try_grow([3, 2, 3], 0).unwrap();
        assert_eq!(grown.dims(), [3, 2, 3]);
        assert_eq!(grown[[0, 0, 0]], 1);
        assert_eq!(grown[[1, 0, 0]], 2);
        assert_eq!(grown[[0, 0, 1]], 3);
        assert_eq!(grown[[1, 0, 1]], 4);
        assert_eq!(grown.iter().filter(|&&v| v == 0).count(), 18 - 4);
        assert_eq!(grown[[2, 1, 2]], 0);
    }

    #[test]
    fn test_crop_round_trips_grow() {
        let buf = Buffer3::new([2, 2, 2], AxisOrder::ZFastest, (0..8).collect::<Vec<u32>>());
        let cropped = buf.try_grow([3, 3, 3], 0).unwrap().try_crop([2, 2, 2]).unwrap();
        assert_eq!(cropped, buf);
    }

    #[test]
    fn test_try_new_filled_reports_overflow() {
        let result = Buffer3::try_new_filled([usize::MAX, 2, 2], AxisOrder::ZFastest, 0u8);
        assert!(result.is_err());
    }
}
