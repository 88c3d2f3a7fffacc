//! Sensitivity of the optimal allocation to crash timing, severity and likelihood
//!
//! # Cost
//!
//! A cut-off/loss sweep costs
//! `|cutoffs| * |losses| * |allocation grid| * horizon` contribution valuations.
//! With the reference axes and a 120-month horizon that is roughly 30 million
//! valuations, so grid points are optimized in parallel with rayon. Every grid
//! point reads the same immutable parameters and writes its own result slot;
//! `collect` keeps row-major order, so the output is identical to a sequential
//! run.
//!
//! # Example
//!
//! ```rust,ignore
//! use crash_allocation::{EconomicParameters, SensitivityAnalyzer, SweepAxes};
//!
//! let params = EconomicParameters::reference();
//! let axes = SweepAxes::reference(&params);
//! let grid = SensitivityAnalyzer::default().sweep_cutoff_and_loss(&params, &axes)?;
//! assert_eq!(grid.shape(), (21, 24));
//! ```

mod export;

pub use export::{GridRow, ProbabilityRow};

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{AllocationError, Result};
use crate::optimizer::{linspace, AllocationOptimizer, OptimalAllocation};
use crate::params::{CrashScenario, EconomicParameters};

/// Axes of a cut-off/loss sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepAxes {
    /// Crash months (columns)
    pub cutoff_months: Vec<u32>,
    /// Crash loss fractions (rows)
    pub loss_fractions: Vec<f64>,
}

impl SweepAxes {
    /// Every month of the horizon against 21 losses from 0% to 50%
    pub fn reference(params: &EconomicParameters) -> Self {
        Self {
            cutoff_months: (1..=params.horizon_months()).collect(),
            loss_fractions: linspace(0.0, 0.5, 21),
        }
    }

    /// Build one crash scenario per grid cell, row-major over losses
    fn scenarios(&self, params: &EconomicParameters) -> Result<Vec<CrashScenario>> {
        if self.cutoff_months.is_empty() {
            return Err(AllocationError::invalid_parameter("cutoff_months", "axis is empty"));
        }
        if self.loss_fractions.is_empty() {
            return Err(AllocationError::invalid_parameter("loss_fractions", "axis is empty"));
        }

        let probability = params.crash().probability();
        let mut scenarios = Vec::with_capacity(self.cutoff_months.len() * self.loss_fractions.len());
        for &loss in &self.loss_fractions {
            for &month in &self.cutoff_months {
                scenarios.push(params.scenario(month, loss, probability)?);
            }
        }
        Ok(scenarios)
    }
}

/// Optimal allocation and value over a (loss, cut-off) grid
///
/// Matrices are indexed `[loss_index][cutoff_index]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityGrid {
    pub cutoff_months: Vec<u32>,
    pub loss_fractions: Vec<f64>,
    /// Crash probability held fixed across the sweep
    pub crash_probability: f64,
    pub optimal_allocation: Vec<Vec<f64>>,
    pub optimal_value: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    /// (rows, columns) = (losses, cut-offs)
    pub fn shape(&self) -> (usize, usize) {
        (self.loss_fractions.len(), self.cutoff_months.len())
    }

    /// Optimum at one grid cell
    pub fn at(&self, loss_index: usize, cutoff_index: usize) -> Option<OptimalAllocation> {
        let allocation = *self.optimal_allocation.get(loss_index)?.get(cutoff_index)?;
        let expected_value = *self.optimal_value.get(loss_index)?.get(cutoff_index)?;
        Some(OptimalAllocation {
            allocation,
            expected_value,
        })
    }
}

/// Optimal allocation and value as the crash probability varies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityCurve {
    pub probabilities: Vec<f64>,
    pub optimal_allocation: Vec<f64>,
    pub optimal_value: Vec<f64>,
}

impl ProbabilityCurve {
    /// 21 probabilities from 0% to 100%
    pub fn reference_probabilities() -> Vec<f64> {
        linspace(0.0, 1.0, 21)
    }
}

/// Reruns the allocation optimizer across crash scenarios
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityAnalyzer {
    optimizer: AllocationOptimizer,
}

impl SensitivityAnalyzer {
    pub fn new(optimizer: AllocationOptimizer) -> Self {
        Self { optimizer }
    }

    /// Optimize at every (crash month, crash loss) pair with the ambient
    /// crash probability held fixed
    pub fn sweep_cutoff_and_loss(&self, params: &EconomicParameters, axes: &SweepAxes) -> Result<SensitivityGrid> {
        let scenarios = axes.scenarios(params)?;
        let (rows, cols) = (axes.loss_fractions.len(), axes.cutoff_months.len());

        info!(
            "Sweeping {} losses x {} cut-offs ({} allocation points, {} months)",
            rows,
            cols,
            self.optimizer.grid().len(),
            params.horizon_months()
        );
        let start = Instant::now();

        let optima = scenarios
            .par_iter()
            .map(|scenario| self.optimizer.optimize_at(params, scenario))
            .collect::<Result<Vec<_>>>()?;

        debug!("Cut-off/loss sweep finished in {:?}", start.elapsed());

        let optimal_allocation: Vec<Vec<f64>> = optima
            .chunks(cols)
            .map(|row| row.iter().map(|o| o.allocation).collect())
            .collect();
        let optimal_value: Vec<Vec<f64>> = optima
            .chunks(cols)
            .map(|row| row.iter().map(|o| o.expected_value).collect())
            .collect();

        Ok(SensitivityGrid {
            cutoff_months: axes.cutoff_months.clone(),
            loss_fractions: axes.loss_fractions.clone(),
            crash_probability: params.crash().probability(),
            optimal_allocation,
            optimal_value,
        })
    }

    /// Optimize at every crash probability with the ambient crash month and
    /// loss held fixed
    pub fn sweep_probability(&self, params: &EconomicParameters, probabilities: &[f64]) -> Result<ProbabilityCurve> {
        if probabilities.is_empty() {
            return Err(AllocationError::invalid_parameter("probabilities", "axis is empty"));
        }
        let scenarios = probabilities
            .iter()
            .map(|&p| params.crash().with_probability(p))
            .collect::<Result<Vec<_>>>()?;

        info!("Sweeping {} crash probabilities", scenarios.len());
        let start = Instant::now();

        let optima = scenarios
            .par_iter()
            .map(|scenario| self.optimizer.optimize_at(params, scenario))
            .collect::<Result<Vec<_>>>()?;

        debug!("Probability sweep finished in {:?}", start.elapsed());

        Ok(ProbabilityCurve {
            probabilities: probabilities.to_vec(),
            optimal_allocation: optima.iter().map(|o| o.allocation).collect(),
            optimal_value: optima.iter().map(|o| o.expected_value).collect(),
        })
    }
}

/// Cut-off/loss sweep on the reference allocation grid
pub fn sweep_cutoff_and_loss(params: &EconomicParameters, axes: &SweepAxes) -> Result<SensitivityGrid> {
    SensitivityAnalyzer::default().sweep_cutoff_and_loss(params, axes)
}

/// Probability sweep on the reference allocation grid
pub fn sweep_probability(params: &EconomicParameters, probabilities: &[f64]) -> Result<ProbabilityCurve> {
    SensitivityAnalyzer::default().sweep_probability(params, probabilities)
}
