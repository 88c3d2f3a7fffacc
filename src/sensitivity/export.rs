//! CSV export of sweep results
//!
//! Grids are written in long format, one row per (loss, cut-off) cell, so they
//! load directly into a spreadsheet pivot or a plotting tool.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{ProbabilityCurve, SensitivityGrid};
use crate::error::Result;

/// One cell of a cut-off/loss grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridRow {
    pub loss_fraction: f64,
    pub cutoff_month: u32,
    pub optimal_allocation: f64,
    pub optimal_value: f64,
}

/// One point of a probability sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub crash_probability: f64,
    pub optimal_allocation: f64,
    pub optimal_value: f64,
}

impl SensitivityGrid {
    /// Cells in row-major order (loss outer, cut-off inner)
    ///
    /// Only cells present on both axes and in both matrices are emitted.
    pub fn rows(&self) -> impl Iterator<Item = GridRow> + '_ {
        let matrix_rows = self.optimal_allocation.iter().zip(&self.optimal_value);
        self.loss_fractions
            .iter()
            .zip(matrix_rows)
            .flat_map(move |(&loss_fraction, (allocations, values))| {
                self.cutoff_months
                    .iter()
                    .zip(allocations.iter().zip(values))
                    .map(move |(&cutoff_month, (&optimal_allocation, &optimal_value))| GridRow {
                        loss_fraction,
                        cutoff_month,
                        optimal_allocation,
                        optimal_value,
                    })
            })
    }

    /// Write the grid as CSV to any writer
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for row in self.rows() {
            out.serialize(row)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the grid as CSV to `path`
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        self.write_csv_to(File::create(path)?)
    }
}

impl ProbabilityCurve {
    pub fn rows(&self) -> impl Iterator<Item = ProbabilityRow> + '_ {
        self.probabilities
            .iter()
            .zip(self.optimal_allocation.iter().zip(&self.optimal_value))
            .map(|(&crash_probability, (&optimal_allocation, &optimal_value))| ProbabilityRow {
                crash_probability,
                optimal_allocation,
                optimal_value,
            })
    }

    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for row in self.rows() {
            out.serialize(row)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        self.write_csv_to(File::create(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> SensitivityGrid {
        SensitivityGrid {
            cutoff_months: vec![3, 9],
            loss_fractions: vec![0.1, 0.2, 0.3],
            crash_probability: 0.5,
            optimal_allocation: vec![vec![1.0, 0.5], vec![0.0, 0.25], vec![0.0, 0.0]],
            optimal_value: vec![vec![10.0, 11.0], vec![12.0, 13.0], vec![14.0, 15.0]],
        }
    }

    #[test]
    fn test_rows_are_row_major() {
        let rows: Vec<GridRow> = small_grid().rows().collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1].cutoff_month, 9);
        assert_eq!(rows[1].loss_fraction, 0.1);
        assert_eq!(rows[3].optimal_allocation, 0.25);
        assert_eq!(rows[5].optimal_value, 15.0);
    }

    #[test]
    fn test_ragged_grid_does_not_panic() {
        let mut grid = small_grid();
        grid.optimal_allocation.truncate(2);
        grid.optimal_value[0].truncate(1);

        let rows: Vec<GridRow> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].optimal_value, 10.0);
        assert_eq!(rows[1].loss_fraction, 0.2);

        let curve = ProbabilityCurve {
            probabilities: vec![0.0, 0.5, 1.0],
            optimal_allocation: vec![1.0],
            optimal_value: vec![20.0, 15.0],
        };
        assert_eq!(curve.rows().count(), 1);
    }

    #[test]
    fn test_grid_csv_output() {
        let mut buffer = Vec::new();
        small_grid().write_csv_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "loss_fraction,cutoff_month,optimal_allocation,optimal_value");
        assert_eq!(lines[1], "0.1,3,1.0,10.0");
    }

    #[test]
    fn test_probability_csv_file() {
        let curve = ProbabilityCurve {
            probabilities: vec![0.0, 1.0],
            optimal_allocation: vec![1.0, 0.0],
            optimal_value: vec![20.0, 10.0],
        };
        let path = std::env::temp_dir().join("crash_allocation_probability_test.csv");
        curve.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("crash_probability,optimal_allocation,optimal_value"));

        std::fs::remove_file(&path).ok();
    }
}
