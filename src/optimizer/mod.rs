//! Grid search for the pre-crash allocation that maximizes expected value
//!
//! The objective is evaluated at every point of an [`AllocationGrid`] in
//! ascending order and the first strict maximum wins, so exact ties resolve to
//! the lowest allocation. There is no continuous refinement step.

mod grid;

pub use grid::{linspace, AllocationGrid};

use serde::Serialize;

use crate::error::{AllocationError, Result};
use crate::expectation::expected_total_value_at;
use crate::params::{CrashScenario, EconomicParameters};

/// Best allocation found on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalAllocation {
    /// Fraction of each pre-crash contribution placed in the ETF
    pub allocation: f64,
    /// Expected terminal value at that allocation
    pub expected_value: f64,
}

/// Expected value at every grid point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationCurve {
    pub allocations: Vec<f64>,
    pub expected_values: Vec<f64>,
}

impl AllocationCurve {
    /// Maximum of the curve, lowest allocation on ties
    pub fn optimum(&self) -> Option<OptimalAllocation> {
        arg_max(self.allocations.iter().copied().zip(self.expected_values.iter().copied()))
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// (allocation, expected value) pairs in ascending allocation order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.allocations.iter().copied().zip(self.expected_values.iter().copied())
    }
}

/// One-dimensional optimizer over the allocation fraction
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationOptimizer {
    grid: AllocationGrid,
}

impl AllocationOptimizer {
    pub fn new(grid: AllocationGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> AllocationGrid {
        self.grid
    }

    /// Optimize under the ambient crash scenario
    pub fn optimize(&self, params: &EconomicParameters) -> Result<OptimalAllocation> {
        self.optimize_at(params, params.crash())
    }

    /// Optimize with the crash branch taken from `scenario`
    pub fn optimize_at(&self, params: &EconomicParameters, scenario: &CrashScenario) -> Result<OptimalAllocation> {
        self.curve_at(params, scenario)?.optimum().ok_or_else(|| {
            AllocationError::invalid_parameter("allocation_grid", "needs at least one point")
        })
    }

    /// Evaluate the whole grid under the ambient crash scenario
    pub fn curve(&self, params: &EconomicParameters) -> Result<AllocationCurve> {
        self.curve_at(params, params.crash())
    }

    /// Evaluate the whole grid with the crash branch taken from `scenario`
    pub fn curve_at(&self, params: &EconomicParameters, scenario: &CrashScenario) -> Result<AllocationCurve> {
        let allocations = self.grid.allocations();
        let expected_values = allocations
            .iter()
            .map(|&x| expected_total_value_at(params, x, scenario))
            .collect::<Result<Vec<_>>>()?;

        Ok(AllocationCurve {
            allocations,
            expected_values,
        })
    }
}

/// Optimal allocation on the reference 101-point grid
pub fn optimal_allocation(params: &EconomicParameters) -> Result<OptimalAllocation> {
    AllocationOptimizer::default().optimize(params)
}

/// Expected-value curve on `grid` (ambient crash scenario)
pub fn allocation_curve(params: &EconomicParameters, grid: AllocationGrid) -> Result<AllocationCurve> {
    AllocationOptimizer::new(grid).curve(params)
}

fn arg_max(points: impl Iterator<Item = (f64, f64)>) -> Option<OptimalAllocation> {
    let mut best: Option<OptimalAllocation> = None;
    for (allocation, expected_value) in points {
        if best.map_or(true, |b| expected_value > b.expected_value) {
            best = Some(OptimalAllocation {
                allocation,
                expected_value,
            });
        }
    }
    best
}
