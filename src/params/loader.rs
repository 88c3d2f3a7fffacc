//! JSON-based parameter loader
//!
//! Loads plan parameters from a JSON object. Missing keys fall back to the
//! defaults in [`EconomicInputs::default`].

use std::fs;
use std::path::Path;

use log::debug;

use super::{EconomicInputs, EconomicParameters};
use crate::error::Result;

/// Default path to the parameter file
pub const DEFAULT_PARAMS_PATH: &str = "data/params.json";

impl EconomicInputs {
    /// Parse raw inputs from a JSON string without validating them
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl EconomicParameters {
    /// Parse and validate parameters from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(EconomicInputs::from_json_str(json)?)
    }

    /// Load parameters from the default location (data/params.json)
    pub fn from_default_path() -> Result<Self> {
        Self::from_json_path(Path::new(DEFAULT_PARAMS_PATH))
    }

    /// Load parameters from a specific JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        debug!("Loading economic parameters from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
