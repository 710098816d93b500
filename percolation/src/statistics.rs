//! Per-pass structure statistics and their text record formats.
//!
//! Percolation record: `threshold maxStructureVolume totalVolume`.
//! Bounding-box record: `structureID minX maxX minY maxY minZ maxZ`.

use std::fmt;
use std::io::{self, Write};

use crate::labeling::{BoundingBox, LabelGrid};

// =============================================================================
// Volumes
// =============================================================================

/// Cell count per label of a cropped label grid. Index 0 is background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureVolumes {
    counts: Vec<u64>,
}

impl StructureVolumes {
    pub fn from_labels(grid: &LabelGrid) -> Self {
        let mut counts = vec![0u64; grid.num_structures() as usize + 1];
        for &label in grid.labels().iter() {
            counts[label as usize] += 1;
        }
        Self { counts }
    }

    #[inline]
    pub fn background(&self) -> u64 {
        self.counts[0]
    }

    /// Volume of structure `label`; `None` for background or unknown labels.
    pub fn volume(&self, label: u32) -> Option<u64> {
        match label {
            0 => None,
            _ => self.counts.get(label as usize).copied(),
        }
    }

    #[inline]
    pub fn num_structures(&self) -> usize {
        self.counts.len() - 1
    }

    /// Largest structure volume, 0 when there is none.
    pub fn max_volume(&self) -> u64 {
        self.counts[1..].iter().copied().max().unwrap_or(0)
    }

    /// Occupied volume over all structures.
    pub fn total_volume(&self) -> u64 {
        self.counts[1..].iter().sum()
    }

    pub fn percolation_record(&self, threshold: f64) -> PercolationRecord {
        PercolationRecord {
            threshold,
            max_structure_volume: self.max_volume(),
            total_volume: self.total_volume(),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercolationRecord {
    pub threshold: f64,
    pub max_structure_volume: u64,
    pub total_volume: u64,
}

impl fmt::Display for PercolationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.threshold, self.max_structure_volume, self.total_volume
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBoxRecord {
    pub structure_id: u32,
    pub bounds: BoundingBox,
}

impl BoundingBoxRecord {
    /// Records for `boxes`, where `boxes[i]` belongs to structure `i + 1`.
    pub fn from_boxes(boxes: &[BoundingBox]) -> impl Iterator<Item = BoundingBoxRecord> + '_ {
        (1u32..).zip(boxes).map(|(structure_id, &bounds)| BoundingBoxRecord {
            structure_id,
            bounds,
        })
    }
}

impl fmt::Display for BoundingBoxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let BoundingBox { min, max } = self.bounds;
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.structure_id, min[0], max[0], min[1], max[1], min[2], max[2]
        )
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Destination for finalized records.
pub trait RecordSink {
    fn percolation(&mut self, record: &PercolationRecord) -> io::Result<()>;

    fn bounding_box(&mut self, record: &BoundingBoxRecord) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one line per record. A missing stream drops its records.
#[derive(Debug)]
pub struct TextRecordWriter<W: Write> {
    percolation: Option<W>,
    bounding_boxes: Option<W>,
}

impl<W: Write> TextRecordWriter<W> {
    pub fn new(percolation: Option<W>, bounding_boxes: Option<W>) -> Self {
        Self {
            percolation,
            bounding_boxes,
        }
    }

    pub fn into_inner(self) -> (Option<W>, Option<W>) {
        (self.percolation, self.bounding_boxes)
    }
}

impl<W: Write> RecordSink for TextRecordWriter<W> {
    fn percolation(&mut self, record: &PercolationRecord) -> io::Result<()> {
        match &mut self.percolation {
            Some(out) => writeln!(out, "{record}"),
            None => Ok(()),
        }
    }

    fn bounding_box(&mut self, record: &BoundingBoxRecord) -> io::Result<()> {
        match &mut self.bounding_boxes {
            Some(out) => writeln!(out, "{record}"),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(out) = &mut self.percolation {
            out.flush()?;
        }
        if let Some(out) = &mut self.bounding_boxes {
            out.flush()?;
        }
        Ok(())
    }
}
