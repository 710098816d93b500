//! Connected component labeling of a padded occupancy grid.
//!
//! Breadth-first flood fill under 26-connectivity:
//! - cells are scanned in the grid's memory order
//! - each unlabeled occupied cell seeds a new structure with the next label
//! - the structure is expanded through a FIFO frontier until it is empty
//!   before the scan resumes
//!
//! Every expansion step collects the neighbors it just linked into a
//! [`LinkMask`] and hands it to a [`LinkFilter`] before the links are promoted
//! to the frontier. Vetoed neighbors go back to unlabeled.

pub mod neighbors;


use std::collections::VecDeque;

use common::Buffer3;

use crate::ambiguity::AmbiguityResolver;
use crate::error::{ExtractError, ExtractResult};
use crate::threshold::OccupancyGrid;

pub use neighbors::{LinkMask, Neighbors, CENTER, NEIGHBOR_COUNT, NEIGHBOR_OFFSETS};

/// Veto hook consulted once per expansion step.
pub trait LinkFilter {
    /// Removes links that must not be promoted.
    ///
    /// Returns the number of ambiguous configurations encountered.
    fn filter(&self, links: &mut LinkMask) -> u32;
}

/// Plain 26-connectivity: every link is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainConnectivity;

impl LinkFilter for PlainConnectivity {
    #[inline]
    fn filter(&self, _links: &mut LinkMask) -> u32 {
        0
    }
}

/// Axis-aligned extent of one structure, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl BoundingBox {
    #[inline]
    fn at(cell: [usize; 3]) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    #[inline]
    fn include(&mut self, cell: [usize; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(cell[axis]);
            self.max[axis] = self.max[axis].max(cell[axis]);
        }
    }
}

/// Label per cell: 0 is background, structures are numbered from 1 in
/// first-encounter scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    labels: Buffer3<u32>,
    num_structures: u32,
}

impl LabelGrid {
    #[inline]
    pub fn labels(&self) -> &Buffer3<u32> {
        &self.labels
    }

    #[inline]
    pub fn num_structures(&self) -> u32 {
        self.num_structures
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.labels.dims()
    }

    #[inline]
    pub fn label_at(&self, coords: [usize; 3]) -> u32 {
        self.labels[coords]
    }

    /// Keeps the `[0, dims)` corner, dropping the padding layer.
    pub fn crop(&self, dims: [usize; 3]) -> ExtractResult<LabelGrid> {
        let labels = self
            .labels
            .try_crop(dims)
            .map_err(|e| ExtractError::exhausted(dims, e))?;
        Ok(LabelGrid {
            labels,
            num_structures: self.num_structures,
        })
    }
}

/// Output of one labeling run.
#[derive(Debug, Clone)]
pub struct Labeling {
    pub grid: LabelGrid,
    /// Indexed by `label - 1`.
    pub bounding_boxes: Vec<BoundingBox>,
    /// Octant case codes that matched the ambiguous-case table.
    pub ambiguous_cases: u64,
    /// Neighbor links withdrawn by the filter.
    pub retracted_links: u64,
}

/// Flood-fill labeler with optional ambiguity resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentLabeler {
    resolver: Option<AmbiguityResolver>,
}

impl ComponentLabeler {
    pub fn new(ambiguity_resolution: bool) -> Self {
        Self {
            resolver: ambiguity_resolution.then_some(AmbiguityResolver),
        }
    }

    /// Plain 26-connectivity labeler.
    pub fn plain() -> Self {
        Self { resolver: None }
    }

    pub fn label(&self, occupancy: &OccupancyGrid) -> ExtractResult<Labeling> {
        match &self.resolver {
            Some(resolver) => label_with(occupancy.cells(), resolver),
            None => label_with(occupancy.cells(), &PlainConnectivity),
        }
    }
}

/// Per-structure scratch state, reused across structures.
#[derive(Debug, Default)]
struct Frontier {
    pending: VecDeque<[usize; 3]>,
}

impl Frontier {
    #[inline]
    fn push(&mut self, cell: [usize; 3]) {
        self.pending.push_back(cell);
    }

    #[inline]
    fn pop(&mut self) -> Option<[usize; 3]> {
        self.pending.pop_front()
    }
}

#[derive(Debug, Default)]
struct StepCounters {
    ambiguous_cases: u64,
    retracted_links: u64,
}

/// Labels `occupancy`, which must already carry its padding layer.
pub fn label_with<F: LinkFilter>(
    occupancy: &Buffer3<bool>,
    filter: &F,
) -> ExtractResult<Labeling> {
    let dims = occupancy.dims();
    let mut labels = Buffer3::try_new_filled(dims, occupancy.order(), 0u32)
        .map_err(|e| ExtractError::exhausted(dims, e))?;

    let mut bounding_boxes = Vec::new();
    let mut frontier = Frontier::default();
    let mut counters = StepCounters::default();
    let mut next_label = 0u32;

    for seed_idx in 0..occupancy.len() {
        if !occupancy[seed_idx] || labels[seed_idx] != 0 {
            continue;
        }

        next_label = next_label
            .checked_add(1)
            .ok_or_else(|| ExtractError::ResourceExhaustion {
                dims,
                reason: "structure count exceeds the u32 label range".to_string(),
            })?;

        let seed = occupancy.coords(seed_idx);
        labels[seed_idx] = next_label;
        let mut bounds = BoundingBox::at(seed);

        frontier.push(seed);
        while let Some(cell) = frontier.pop() {
            expand_cell(
                occupancy,
                &mut labels,
                cell,
                next_label,
                filter,
                &mut frontier,
                &mut bounds,
                &mut counters,
            );
        }

        log::trace!(
            "structure {} complete, bounds {:?}..={:?}",
            next_label,
            bounds.min,
            bounds.max
        );
        bounding_boxes.push(bounds);
    }

    Ok(Labeling {
        grid: LabelGrid {
            labels,
            num_structures: next_label,
        },
        bounding_boxes,
        ambiguous_cases: counters.ambiguous_cases,
        retracted_links: counters.retracted_links,
    })
}

/// Links the unlabeled occupied neighbors of `cell`, lets the filter veto
/// some of them, and queues the survivors.
#[allow(clippy::too_many_arguments)]
#[inline]
fn expand_cell<F: LinkFilter>(
    occupancy: &Buffer3<bool>,
    labels: &mut Buffer3<u32>,
    cell: [usize; 3],
    label: u32,
    filter: &F,
    frontier: &mut Frontier,
    bounds: &mut BoundingBox,
    counters: &mut StepCounters,
) {
    let dims = occupancy.dims();
    let mut linked = LinkMask::center_only();
    let mut targets = [0usize; NEIGHBOR_COUNT];

    for (n, coords) in Neighbors::new(cell, dims) {
        let idx = occupancy.index(coords);
        if occupancy[idx] && labels[idx] == 0 {
            labels[idx] = label;
            linked.insert(n);
            targets[n] = idx;
        }
    }

    if linked.is_center_only() {
        return;
    }

    let mut kept = linked;
    counters.ambiguous_cases += u64::from(filter.filter(&mut kept));

    for n in linked.difference(kept).neighbors() {
        labels[targets[n]] = 0;
        counters.retracted_links += 1;
    }

    for n in kept.neighbors() {
        let coords = occupancy.coords(targets[n]);
        frontier.push(coords);
        bounds.include(coords);
    }
}
