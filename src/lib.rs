//! Crash Allocation - expected-value optimizer for monthly ETF/cash savings plans
//!
//! This library provides:
//! - Terminal value of a single contribution under crash and no-crash scenarios
//! - Probability-weighted expected value over the full contribution horizon
//! - Grid search for the pre-crash ETF allocation that maximizes it
//! - Sensitivity sweeps over crash timing, severity and probability

pub mod error;
pub mod params;
pub mod valuation;
pub mod expectation;
pub mod optimizer;
pub mod sensitivity;

// Re-export commonly used types
pub use error::{AllocationError, Result, Scenario};
pub use params::{CrashScenario, EconomicInputs, EconomicParameters};
pub use valuation::ValuationModel;
pub use expectation::{expected_total_value, expected_total_value_at, scenario_totals, ScenarioTotals};
pub use optimizer::{
    allocation_curve, optimal_allocation, AllocationCurve, AllocationGrid, AllocationOptimizer,
    OptimalAllocation,
};
pub use sensitivity::{
    sweep_cutoff_and_loss, sweep_probability, ProbabilityCurve, SensitivityAnalyzer,
    SensitivityGrid, SweepAxes,
};
