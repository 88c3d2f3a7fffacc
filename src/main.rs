//! Crash Allocation CLI
//!
//! Prints the optimal pre-crash ETF allocation for a savings plan, along with
//! the expected value at a few sample allocations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crash_allocation::{
    allocation_curve, scenario_totals, AllocationCurve, AllocationGrid, AllocationOptimizer,
    EconomicInputs, EconomicParameters, OptimalAllocation, ScenarioTotals,
};

#[derive(Parser, Debug)]
#[command(name = "crash_allocation", version, about = "Optimal ETF/cash split ahead of a possible crash")]
struct Args {
    /// JSON parameter file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Monthly contribution
    #[arg(long)]
    budget: Option<f64>,

    /// Number of monthly contributions
    #[arg(long)]
    months: Option<u32>,

    /// Annual cash rate in percent
    #[arg(long)]
    cash_rate_pct: Option<f64>,

    /// Annual ETF return without a crash, in percent
    #[arg(long)]
    stock_rate_pct: Option<f64>,

    /// ETF loss at the crash, in percent
    #[arg(long)]
    crash_loss_pct: Option<f64>,

    /// Annual return of shares bought cheaply at the crash, in percent
    #[arg(long)]
    cheap_rate_pct: Option<f64>,

    /// Month in which the crash happens
    #[arg(long)]
    cutoff: Option<u32>,

    /// Crash probability in percent
    #[arg(long)]
    crash_probability_pct: Option<f64>,

    /// Number of allocation grid points
    #[arg(long, default_value_t = 101)]
    grid_points: usize,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    parameters: EconomicInputs,
    optimum: OptimalAllocation,
    totals_at_optimum: ScenarioTotals,
    total_contributions: f64,
    sample_table: AllocationCurve,
    curve: AllocationCurve,
}

impl Args {
    fn parameters(&self) -> Result<EconomicParameters> {
        let mut inputs = match &self.config {
            Some(path) => EconomicParameters::from_json_path(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?
                .to_inputs(),
            None => EconomicInputs::default(),
        };

        if let Some(v) = self.budget {
            inputs.monthly_budget = v;
        }
        if let Some(v) = self.months {
            inputs.horizon_months = v;
        }
        if let Some(v) = self.cash_rate_pct {
            inputs.cash_annual_rate = v / 100.0;
        }
        if let Some(v) = self.stock_rate_pct {
            inputs.stock_annual_rate = v / 100.0;
        }
        if let Some(v) = self.crash_loss_pct {
            inputs.crash_loss_fraction = v / 100.0;
        }
        if let Some(v) = self.cheap_rate_pct {
            inputs.cheap_stock_annual_rate = v / 100.0;
        }
        if let Some(v) = self.cutoff {
            inputs.crash_month = v;
        }
        if let Some(v) = self.crash_probability_pct {
            inputs.crash_probability = v / 100.0;
        }

        Ok(EconomicParameters::new(inputs)?)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = args.parameters()?;
    let grid = AllocationGrid::new(args.grid_points)?;

    let optimizer = AllocationOptimizer::new(grid);
    let curve = optimizer.curve(&params)?;
    let optimum = curve.optimum().context("allocation grid is empty")?;
    let totals = scenario_totals(&params, optimum.allocation, params.crash())?;
    let sample_table = allocation_curve(&params, AllocationGrid::SAMPLE_TABLE)?;

    if args.json {
        let report = Report {
            parameters: params.to_inputs(),
            optimum,
            totals_at_optimum: totals,
            total_contributions: params.total_contributions(),
            sample_table,
            curve,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let crash = params.crash();
    println!("Crash Allocation v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");

    println!("Plan:");
    println!("  Monthly Budget:   {:.2}", params.monthly_budget());
    println!("  Horizon:          {} months", params.horizon_months());
    println!("  Contributions:    {:.2}", params.total_contributions());
    println!("  Cash Rate:        {:.2}%", params.cash_annual_rate() * 100.0);
    println!("  ETF Rate:         {:.2}%", params.stock_annual_rate() * 100.0);
    println!("  Cheap Share Rate: {:.2}%", params.cheap_stock_annual_rate() * 100.0);
    println!(
        "  Crash:            month {}, {:.1}% loss, {:.0}% probability",
        crash.month(),
        crash.loss_fraction() * 100.0,
        crash.probability() * 100.0
    );
    println!();

    println!("Optimal pre-crash split: {:.2} of each contribution in the ETF", optimum.allocation);
    println!("Expected terminal value: {:.2}", optimum.expected_value);
    println!("  No-crash total: {:.2}", totals.no_crash);
    println!("  Crash total:    {:.2}", totals.crash);
    println!();

    println!("{:>12} {:>18}", "ETF share", "Expected value");
    println!("{}", "-".repeat(31));
    for (x, value) in sample_table.points() {
        println!("{:>12.2} {:>18.2}", x, value);
    }

    Ok(())
}
