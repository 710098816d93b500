//! Multiscale box counting of an occupancy grid.
//!
//! The grid is embedded in the smallest cube of side `2^p` that covers its
//! largest dimension. Level `k` counts the boxes of side `2^k` holding at
//! least one occupied cell; each level is the OR-reduction of the 2×2×2
//! blocks of the level below. Only the occupied extent is materialized, the
//! embedding cube is implied.

use common::Buffer3;

use crate::error::{ExtractError, ExtractResult};

#[derive(Debug, Clone, PartialEq)]
pub struct BoxCount {
    /// Box side per level, `1, 2, 4, ..., 2^p`.
    pub sizes: Vec<usize>,
    /// Occupied boxes per level.
    pub counts: Vec<u64>,
}

/// Mean and population standard deviation of the local exponents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalEstimate {
    pub mean: f64,
    pub std_dev: f64,
}

pub fn box_count(occupancy: &Buffer3<bool>) -> ExtractResult<BoxCount> {
    let dims = occupancy.dims();
    let largest = dims.iter().copied().max().unwrap_or(0).max(1);
    let levels = largest.next_power_of_two().trailing_zeros() as usize;

    let mut sizes = Vec::with_capacity(levels + 1);
    let mut counts = Vec::with_capacity(levels + 1);
    sizes.push(1);
    counts.push(occupied(occupancy));

    let mut coarser: Option<Buffer3<bool>> = None;
    for k in 1..=levels {
        let level = reduce(coarser.as_ref().unwrap_or(occupancy))?;
        sizes.push(1 << k);
        counts.push(occupied(&level));
        coarser = Some(level);
    }

    Ok(BoxCount { sizes, counts })
}

fn occupied(grid: &Buffer3<bool>) -> u64 {
    grid.iter().filter(|&&cell| cell).count() as u64
}

/// OR of every 2×2×2 block; odd trailing layers pair with implied empty cells.
fn reduce(grid: &Buffer3<bool>) -> ExtractResult<Buffer3<bool>> {
    let dims = grid.dims();
    let half = dims.map(|n| n.div_ceil(2));
    let mut coarse = Buffer3::try_new_filled(half, grid.order(), false)
        .map_err(|e| ExtractError::exhausted(half, e))?;

    for idx in 0..grid.len() {
        if grid[idx] {
            let [x, y, z] = grid.coords(idx);
            coarse[[x / 2, y / 2, z / 2]] = true;
        }
    }
    Ok(coarse)
}

impl BoxCount {
    /// `d[k] = -(ln n[k+1] - ln n[k]) / (ln r[k+1] - ln r[k])`.
    ///
    /// Empty when the grid holds no occupied cell.
    pub fn local_exponents(&self) -> Vec<f64> {
        if matches!(self.counts.first(), None | Some(0)) {
            return Vec::new();
        }
        self.counts
            .windows(2)
            .zip(self.sizes.windows(2))
            .map(|(n, r)| {
                let dn = (n[1] as f64).ln() - (n[0] as f64).ln();
                let dr = (r[1] as f64).ln() - (r[0] as f64).ln();
                -dn / dr
            })
            .collect()
    }

    /// Estimate from every exponent but the two coarsest.
    pub fn fractal_dimension(&self) -> Option<FractalEstimate> {
        let exponents = self.local_exponents();
        let used = &exponents[..exponents.len().saturating_sub(2)];
        if used.is_empty() {
            return None;
        }

        let n = used.len() as f64;
        let mean = used.iter().sum::<f64>() / n;
        let variance = used.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        Some(FractalEstimate {
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
