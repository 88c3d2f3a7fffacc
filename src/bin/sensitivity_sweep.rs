//! Run the cut-off/loss and probability sensitivity sweeps
//!
//! Writes both results as CSV. Parameters come from a JSON file (default
//! data/params.json, falling back to the built-in defaults when it is absent).
//!
//! Usage: cargo run --release --bin sensitivity_sweep -- --out-dir output

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use crash_allocation::optimizer::linspace;
use crash_allocation::params::DEFAULT_PARAMS_PATH;
use crash_allocation::{
    AllocationGrid, AllocationOptimizer, EconomicParameters, SensitivityAnalyzer, SweepAxes,
};

#[derive(Parser, Debug)]
#[command(name = "sensitivity_sweep", about = "Optimal allocation across crash timing, severity and probability")]
struct Args {
    /// JSON parameter file
    #[arg(long, default_value = DEFAULT_PARAMS_PATH)]
    config: PathBuf,

    /// Directory for the CSV output
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Largest crash loss on the loss axis
    #[arg(long, default_value_t = 0.5)]
    max_loss: f64,

    /// Number of points on the loss axis
    #[arg(long, default_value_t = 21)]
    loss_points: usize,

    /// Number of points on the probability axis
    #[arg(long, default_value_t = 21)]
    probability_points: usize,

    /// Number of allocation grid points per optimization
    #[arg(long, default_value_t = 101)]
    grid_points: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let params = if args.config.exists() {
        EconomicParameters::from_json_path(&args.config)
            .with_context(|| format!("loading parameters from {}", args.config.display()))?
    } else {
        warn!("{} not found, using default parameters", args.config.display());
        EconomicParameters::reference()
    };

    let analyzer = SensitivityAnalyzer::new(AllocationOptimizer::new(AllocationGrid::new(args.grid_points)?));

    let axes = SweepAxes {
        loss_fractions: linspace(0.0, args.max_loss, args.loss_points),
        ..SweepAxes::reference(&params)
    };

    println!(
        "Running cut-off/loss sweep ({} x {})...",
        axes.loss_fractions.len(),
        axes.cutoff_months.len()
    );
    let grid = analyzer.sweep_cutoff_and_loss(&params, &axes)?;

    let probabilities = linspace(0.0, 1.0, args.probability_points);
    println!("Running probability sweep ({} points)...", probabilities.len());
    let curve = analyzer.sweep_probability(&params, &probabilities)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let grid_path = args.out_dir.join("sensitivity_cutoff_loss.csv");
    grid.write_csv(&grid_path)?;
    println!("Grid written to {}", grid_path.display());

    let curve_path = args.out_dir.join("sensitivity_probability.csv");
    curve.write_csv(&curve_path)?;
    println!("Probability curve written to {}", curve_path.display());

    // Corners of the grid for a quick sanity check
    let (rows, cols) = grid.shape();
    println!("\nGrid corners (loss, cut-off -> optimal x, expected value):");
    for (i, j) in [(0, 0), (0, cols - 1), (rows - 1, 0), (rows - 1, cols - 1)] {
        if let Some(cell) = grid.at(i, j) {
            println!(
                "  {:>5.1}%, month {:>3} -> {:.2}, {:.2}",
                grid.loss_fractions[i] * 100.0,
                grid.cutoff_months[j],
                cell.allocation,
                cell.expected_value
            );
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
