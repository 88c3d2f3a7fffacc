//! Evenly spaced grids over the allocation fraction

use serde::Serialize;

use crate::error::{AllocationError, Result};

/// `n` evenly spaced points from `start` to `stop` inclusive
///
/// Point `i` is `start + i * step` and the last point is pinned to `stop`, so
/// `linspace(0.0, 1.0, 101)` yields exactly 0.0, 0.01, ..., 1.0 at the ends.
/// A single point yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            points[n - 1] = stop;
            points
        }
    }
}

/// Discretization of the allocation fraction over [0, 1]
///
/// The granularity is part of the optimizer's contract: it bounds the
/// precision of the reported optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationGrid {
    points: usize,
}

impl AllocationGrid {
    /// 101 points, step 0.01
    pub const REFERENCE: AllocationGrid = AllocationGrid { points: 101 };

    /// 0.0, 0.2, ..., 1.0
    pub const SAMPLE_TABLE: AllocationGrid = AllocationGrid { points: 6 };

    pub fn new(points: usize) -> Result<Self> {
        if points == 0 {
            return Err(AllocationError::invalid_parameter(
                "allocation_grid",
                "needs at least one point",
            ));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points == 0
    }

    /// Grid points in ascending order
    pub fn allocations(&self) -> Vec<f64> {
        linspace(0.0, 1.0, self.points)
    }
}

impl Default for AllocationGrid {
    fn default() -> Self {
        Self::REFERENCE
    }
}
