//! Economic parameters for the savings plan and crash scenario
//!
//! `EconomicInputs` is the raw, freely constructible form (serde defaults match
//! the reference plan). `EconomicParameters` is the validated form every
//! valuation function takes; the only ways to obtain one go through
//! [`EconomicParameters::new`] or deserialization, both of which validate.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};

pub use loader::DEFAULT_PARAMS_PATH;

/// Months per year used to convert month counts into compounding years
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Unvalidated plan and market assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicInputs {
    /// Contribution made at the start of every month (currency units)
    pub monthly_budget: f64,

    /// Number of monthly contributions
    pub horizon_months: u32,

    /// Annual return on the cash leg
    pub cash_annual_rate: f64,

    /// Annual return on the ETF leg when no crash happens
    pub stock_annual_rate: f64,

    /// Fraction of ETF value lost at the crash instant
    pub crash_loss_fraction: f64,

    /// Annual return on cheap shares bought with cash at the crash
    pub cheap_stock_annual_rate: f64,

    /// Month (1-indexed) in which the crash happens
    pub crash_month: u32,

    /// Probability weight of the crash scenario
    pub crash_probability: f64,
}

impl Default for EconomicInputs {
    fn default() -> Self {
        Self {
            monthly_budget: 500.0,
            horizon_months: 24,
            cash_annual_rate: 0.0275,
            stock_annual_rate: 0.10,
            crash_loss_fraction: 0.30,
            cheap_stock_annual_rate: 0.20,
            crash_month: 12,
            crash_probability: 0.50,
        }
    }
}

/// Validated plan and market assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EconomicInputs", into = "EconomicInputs")]
pub struct EconomicParameters {
    monthly_budget: f64,
    horizon_months: u32,
    cash_annual_rate: f64,
    stock_annual_rate: f64,
    cheap_stock_annual_rate: f64,
    crash: CrashScenario,
}

impl EconomicParameters {
    /// Validate raw inputs
    pub fn new(inputs: EconomicInputs) -> Result<Self> {
        require_finite("monthly_budget", inputs.monthly_budget)?;
        if inputs.monthly_budget <= 0.0 {
            return Err(AllocationError::invalid_parameter(
                "monthly_budget",
                format!("must be positive, got {}", inputs.monthly_budget),
            ));
        }
        if inputs.horizon_months < 1 {
            return Err(AllocationError::invalid_parameter(
                "horizon_months",
                "must be at least 1",
            ));
        }
        require_rate("cash_annual_rate", inputs.cash_annual_rate)?;
        require_rate("stock_annual_rate", inputs.stock_annual_rate)?;
        require_rate("cheap_stock_annual_rate", inputs.cheap_stock_annual_rate)?;

        let crash = CrashScenario::new(
            inputs.crash_month,
            inputs.crash_loss_fraction,
            inputs.crash_probability,
            inputs.horizon_months,
        )?;

        Ok(Self {
            monthly_budget: inputs.monthly_budget,
            horizon_months: inputs.horizon_months,
            cash_annual_rate: inputs.cash_annual_rate,
            stock_annual_rate: inputs.stock_annual_rate,
            cheap_stock_annual_rate: inputs.cheap_stock_annual_rate,
            crash,
        })
    }

    /// Reference plan: 500 a month for 24 months, crash in month 12 (always valid)
    pub fn reference() -> Self {
        let defaults = EconomicInputs::default();
        let crash = CrashScenario {
            month: defaults.crash_month,
            loss_fraction: defaults.crash_loss_fraction,
            probability: defaults.crash_probability,
            cheap_share_multiplier: 1.0 / (1.0 - defaults.crash_loss_fraction),
        };
        Self {
            monthly_budget: defaults.monthly_budget,
            horizon_months: defaults.horizon_months,
            cash_annual_rate: defaults.cash_annual_rate,
            stock_annual_rate: defaults.stock_annual_rate,
            cheap_stock_annual_rate: defaults.cheap_stock_annual_rate,
            crash,
        }
    }

    /// Copy the parameters back into raw, editable form
    pub fn to_inputs(&self) -> EconomicInputs {
        EconomicInputs {
            monthly_budget: self.monthly_budget,
            horizon_months: self.horizon_months,
            cash_annual_rate: self.cash_annual_rate,
            stock_annual_rate: self.stock_annual_rate,
            crash_loss_fraction: self.crash.loss_fraction,
            cheap_stock_annual_rate: self.cheap_stock_annual_rate,
            crash_month: self.crash.month,
            crash_probability: self.crash.probability,
        }
    }

    /// Build a crash scenario against this horizon
    pub fn scenario(&self, month: u32, loss_fraction: f64, probability: f64) -> Result<CrashScenario> {
        CrashScenario::new(month, loss_fraction, probability, self.horizon_months)
    }

    #[inline]
    pub fn monthly_budget(&self) -> f64 {
        self.monthly_budget
    }

    #[inline]
    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    #[inline]
    pub fn cash_annual_rate(&self) -> f64 {
        self.cash_annual_rate
    }

    #[inline]
    pub fn stock_annual_rate(&self) -> f64 {
        self.stock_annual_rate
    }

    #[inline]
    pub fn cheap_stock_annual_rate(&self) -> f64 {
        self.cheap_stock_annual_rate
    }

    /// The crash scenario given by the parameter set itself
    #[inline]
    pub fn crash(&self) -> &CrashScenario {
        &self.crash
    }

    /// Sum of all contributions, ignoring growth
    pub fn total_contributions(&self) -> f64 {
        self.monthly_budget * self.horizon_months as f64
    }
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<EconomicInputs> for EconomicParameters {
    type Error = AllocationError;

    fn try_from(inputs: EconomicInputs) -> Result<Self> {
        Self::new(inputs)
    }
}

impl From<EconomicParameters> for EconomicInputs {
    fn from(params: EconomicParameters) -> Self {
        params.to_inputs()
    }
}

/// Crash timing, severity and likelihood
///
/// The ambient scenario comes from [`EconomicParameters::crash`]; sweeps build
/// overrides with [`EconomicParameters::scenario`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashScenario {
    month: u32,
    loss_fraction: f64,
    probability: f64,
    // 1 / (1 - loss): cash converts into this many cheap shares per unit
    cheap_share_multiplier: f64,
}

impl CrashScenario {
    /// Validate a scenario against a horizon of `horizon_months`
    ///
    /// Valuation re-checks the month against the horizon of the parameters the
    /// scenario is used with; prefer [`EconomicParameters::scenario`].
    pub fn new(month: u32, loss_fraction: f64, probability: f64, horizon_months: u32) -> Result<Self> {
        if month < 1 || month > horizon_months {
            return Err(AllocationError::invalid_parameter(
                "crash_month",
                format!("must be within [1, {horizon_months}], got {month}"),
            ));
        }
        require_finite("crash_loss_fraction", loss_fraction)?;
        if !(0.0..1.0).contains(&loss_fraction) {
            return Err(AllocationError::invalid_parameter(
                "crash_loss_fraction",
                format!("must be within [0, 1), got {loss_fraction}"),
            ));
        }
        require_finite("crash_probability", probability)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(AllocationError::invalid_parameter(
                "crash_probability",
                format!("must be within [0, 1], got {probability}"),
            ));
        }

        Ok(Self {
            month,
            loss_fraction,
            probability,
            cheap_share_multiplier: 1.0 / (1.0 - loss_fraction),
        })
    }

    /// Same timing and severity with a different probability
    pub fn with_probability(self, probability: f64) -> Result<Self> {
        require_finite("crash_probability", probability)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(AllocationError::invalid_parameter(
                "crash_probability",
                format!("must be within [0, 1], got {probability}"),
            ));
        }
        Ok(Self { probability, ..self })
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub fn loss_fraction(&self) -> f64 {
        self.loss_fraction
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[inline]
    pub fn cheap_share_multiplier(&self) -> f64 {
        self.cheap_share_multiplier
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AllocationError::invalid_parameter(name, format!("must be finite, got {value}")))
    }
}

fn require_rate(name: &'static str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(AllocationError::invalid_parameter(
            name,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(f: impl FnOnce(&mut EconomicInputs)) -> Result<EconomicParameters> {
        let mut inputs = EconomicInputs::default();
        f(&mut inputs);
        EconomicParameters::new(inputs)
    }

    fn rejected_field(result: Result<EconomicParameters>) -> &'static str {
        match result {
            Err(AllocationError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_matches_validated_defaults() {
        let validated = EconomicParameters::new(EconomicInputs::default()).unwrap();
        assert_eq!(validated, EconomicParameters::reference());
        assert_eq!(validated.total_contributions(), 12_000.0);
    }

    #[test]
    fn test_rejects_total_loss() {
        assert_eq!(rejected_field(with(|i| i.crash_loss_fraction = 1.0)), "crash_loss_fraction");
        assert_eq!(rejected_field(with(|i| i.crash_loss_fraction = -0.1)), "crash_loss_fraction");
    }

    #[test]
    fn test_rejects_bad_horizon_and_month() {
        assert_eq!(rejected_field(with(|i| i.horizon_months = 0)), "horizon_months");
        assert_eq!(rejected_field(with(|i| i.crash_month = 0)), "crash_month");
        assert_eq!(rejected_field(with(|i| i.crash_month = 25)), "crash_month");
        assert!(with(|i| i.crash_month = 24).is_ok());
    }

    #[test]
    fn test_rejects_bad_rates_and_probability() {
        assert_eq!(rejected_field(with(|i| i.monthly_budget = 0.0)), "monthly_budget");
        assert_eq!(rejected_field(with(|i| i.cash_annual_rate = -0.01)), "cash_annual_rate");
        assert_eq!(rejected_field(with(|i| i.stock_annual_rate = f64::NAN)), "stock_annual_rate");
        assert_eq!(
            rejected_field(with(|i| i.cheap_stock_annual_rate = f64::INFINITY)),
            "cheap_stock_annual_rate"
        );
        assert_eq!(rejected_field(with(|i| i.crash_probability = 1.5)), "crash_probability");
    }

    #[test]
    fn test_round_trip_through_inputs() {
        let params = with(|i| {
            i.horizon_months = 60;
            i.crash_month = 30;
        })
        .unwrap();
        let again = EconomicParameters::new(params.to_inputs()).unwrap();
        assert_eq!(params, again);
    }

    #[test]
    fn test_scenario_override_validated_against_horizon() {
        let params = EconomicParameters::reference();
        assert!(params.scenario(24, 0.5, 0.5).is_ok());
        assert!(params.scenario(25, 0.5, 0.5).is_err());

        let scenario = params.scenario(6, 0.5, 0.25).unwrap();
        assert_eq!(scenario.cheap_share_multiplier(), 2.0);
        assert_eq!(scenario.with_probability(1.0).unwrap().probability(), 1.0);
        assert!(scenario.with_probability(-0.1).is_err());
    }
}
