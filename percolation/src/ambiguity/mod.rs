//! Marching-cubes disambiguation of diagonal links.
//!
//! The 3×3×3 neighborhood of the expanded cell splits into 8 overlapping
//! 2×2×2 octants, each containing the cell itself as its anchor corner. For
//! every octant the just-linked neighbors form an 8-bit case code. When the
//! code is ambiguous, every corner group that does not contain the anchor is
//! unlinked: those neighbors touch the expanded cell only through a diagonal
//! that the reconstructed surface would keep apart.
//!
//! All 8 case codes are computed from the links as they were before any
//! removal.

mod case_table;


pub use case_table::OUTLIER_CASES;

use crate::labeling::{LinkFilter, LinkMask, CENTER};

/// Neighbor index of every corner of every octant.
///
/// Row `o` is octant `o`, column `i` is corner `i` of its case code. The
/// expanded cell appears once per row as [`CENTER`].
pub const OCTANT_CORNERS: [[usize; 8]; 8] = [
    [5, 14, 23, 17, CENTER, 0, 7, 3],
    [15, 5, 17, 25, 1, CENTER, 3, 9],
    [24, 16, 5, 15, 8, 2, CENTER, 1],
    [16, 22, 14, 5, 2, 6, 0, CENTER],
    [CENTER, 0, 7, 3, 4, 10, 19, 13],
    [1, CENTER, 3, 9, 11, 4, 13, 21],
    [8, 2, CENTER, 1, 20, 12, 4, 11],
    [2, 6, 0, CENTER, 12, 18, 10, 4],
];

/// Corner of each octant occupied by the expanded cell.
pub const OCTANT_ANCHOR: [u8; 8] = [4, 5, 6, 7, 0, 1, 2, 3];

/// Case code of octant `octant` under `links`.
#[inline]
pub fn case_code(links: LinkMask, octant: usize) -> u8 {
    OCTANT_CORNERS[octant]
        .iter()
        .enumerate()
        .filter(|&(_, &n)| links.contains(n))
        .fold(0u8, |code, (corner, _)| code | (1 << corner))
}

/// Corner groups of an ambiguous code; empty when `code` is unambiguous.
#[inline]
pub fn ambiguous_groups(code: u8) -> &'static [&'static [u8]] {
    OUTLIER_CASES[code as usize]
}

#[inline]
pub fn is_ambiguous(code: u8) -> bool {
    !ambiguous_groups(code).is_empty()
}

/// [`LinkFilter`] that unlinks neighbors reached only through an ambiguous
/// diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbiguityResolver;

impl LinkFilter for AmbiguityResolver {
    fn filter(&self, links: &mut LinkMask) -> u32 {
        let linked = *links;
        let mut ambiguous = 0;

        for (octant, corners) in OCTANT_CORNERS.iter().enumerate() {
            let groups = ambiguous_groups(case_code(linked, octant));
            if groups.is_empty() {
                continue;
            }
            ambiguous += 1;

            let anchor = OCTANT_ANCHOR[octant];
            for group in groups.iter().filter(|group| !group.contains(&anchor)) {
                for &corner in group.iter() {
                    links.remove(corners[corner as usize]);
                }
            }
        }

        ambiguous
    }
}
