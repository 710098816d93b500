//! The 26-neighborhood of a cell.
//!
//! Neighbor indices are stable: faces first, then edges, then corners. The
//! labeler links and enqueues neighbors in this order, and the octant table in
//! the ambiguity resolver refers to neighbors by these indices.

/// Number of neighbors of a cell under 26-connectivity.
pub const NEIGHBOR_COUNT: usize = 26;

/// Pseudo-neighbor index of the cell itself (offset `[0, 0, 0]`).
pub const CENTER: usize = 26;

/// Offsets indexed by neighbor index, with [`CENTER`] last.
pub const NEIGHBOR_OFFSETS: [[i8; 3]; NEIGHBOR_COUNT + 1] = [
    // faces
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    // edges
    [1, 1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [0, 1, 1],
    [0, -1, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, -1],
    [0, -1, -1],
    // corners
    [1, 1, 1],
    [1, -1, 1],
    [-1, 1, 1],
    [-1, -1, 1],
    [1, 1, -1],
    [1, -1, -1],
    [-1, 1, -1],
    [-1, -1, -1],
    // center
    [0, 0, 0],
];

/// Applies neighbor `n`'s offset to `cell`. `None` if the result leaves `dims`.
#[inline]
pub fn offset_cell(cell: [usize; 3], n: usize, dims: [usize; 3]) -> Option<[usize; 3]> {
    let offset = NEIGHBOR_OFFSETS[n];
    let mut out = [0usize; 3];
    for axis in 0..3 {
        let shifted = cell[axis].checked_add_signed(offset[axis] as isize)?;
        if shifted >= dims[axis] {
            return None;
        }
        out[axis] = shifted;
    }
    Some(out)
}

/// In-range neighbors of a cell, as `(neighbor index, coordinates)`.
///
/// Out-of-range offsets are skipped, never produced.
#[derive(Debug, Clone)]
pub struct Neighbors {
    cell: [usize; 3],
    dims: [usize; 3],
    next: usize,
}

impl Neighbors {
    #[inline]
    pub fn new(cell: [usize; 3], dims: [usize; 3]) -> Self {
        Self { cell, dims, next: 0 }
    }
}

impl Iterator for Neighbors {
    type Item = (usize, [usize; 3]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.next < NEIGHBOR_COUNT {
            let n = self.next;
            self.next += 1;
            if let Some(coords) = offset_cell(self.cell, n, self.dims) {
                return Some((n, coords));
            }
        }
        None
    }
}

/// Set of neighbor indices linked during one expansion step.
///
/// Bit `n` stands for neighbor `n`; the [`CENTER`] bit is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMask(u32);

impl LinkMask {
    #[inline]
    pub fn center_only() -> Self {
        LinkMask(1 << CENTER)
    }

    #[inline]
    pub fn contains(self, n: usize) -> bool {
        self.0 & (1 << n) != 0
    }

    #[inline]
    pub fn insert(&mut self, n: usize) {
        self.0 |= 1 << n;
    }

    #[inline]
    pub fn remove(&mut self, n: usize) {
        debug_assert_ne!(n, CENTER, "the center cell cannot be unlinked");
        self.0 &= !(1 << n);
    }

    /// True when no neighbor besides the center is linked.
    #[inline]
    pub fn is_center_only(self) -> bool {
        self.0 == 1 << CENTER
    }

    /// Linked neighbor indices, ascending, center excluded.
    pub fn neighbors(self) -> impl Iterator<Item = usize> {
        (0..NEIGHBOR_COUNT).filter(move |&n| self.contains(n))
    }

    /// Neighbors linked in `self` but not in `other`.
    pub fn difference(self, other: LinkMask) -> LinkMask {
        LinkMask(self.0 & !other.0)
    }
}
