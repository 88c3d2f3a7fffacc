//! Error types for the allocation engine

use std::fmt;
use thiserror::Error;

/// Result type alias for allocation engine operations
pub type Result<T> = std::result::Result<T, AllocationError>;

/// Which branch of the model produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    NoCrash,
    Crash,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::NoCrash => write!(f, "no-crash"),
            Scenario::Crash => write!(f, "crash"),
        }
    }
}

/// Errors raised by parameter validation, valuation and export
#[derive(Error, Debug)]
pub enum AllocationError {
    /// A parameter is outside its valid range
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Compounding produced a non-finite value
    ///
    /// `month` is `None` when the horizon total overflowed rather than a
    /// single contribution.
    #[error("Numeric overflow in {scenario} valuation{}", month_suffix(.month))]
    NumericOverflow { scenario: Scenario, month: Option<u32> },

    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON parameter file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write CSV output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn month_suffix(month: &Option<u32>) -> String {
    month.map(|m| format!(" at month {m}")).unwrap_or_default()
}

impl AllocationError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create an overflow error for a single contribution month
    pub fn overflow_at(scenario: Scenario, month: u32) -> Self {
        Self::NumericOverflow {
            scenario,
            month: Some(month),
        }
    }

    /// Create an overflow error for a horizon total
    pub fn overflow_total(scenario: Scenario) -> Self {
        Self::NumericOverflow {
            scenario,
            month: None,
        }
    }
}
