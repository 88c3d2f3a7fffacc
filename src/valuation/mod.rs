//! Terminal value of a single monthly contribution under each scenario
//!
//! These functions sit on the innermost loop of the sensitivity sweep, so they
//! do no allocation and take the crash scenario by reference. Months are
//! 1-indexed and must lie within the horizon, allocations within [0, 1], and
//! the crash month of a scenario within the horizon of the model's parameters.
//! Anything else is an `InvalidParameter` error.

mod growth;

pub use growth::{growth_factor, months_to_years};

use crate::error::{AllocationError, Result, Scenario};
use crate::params::{CrashScenario, EconomicParameters};

/// Values single contributions against a fixed parameter set
#[derive(Debug, Clone, Copy)]
pub struct ValuationModel<'a> {
    params: &'a EconomicParameters,
}

impl<'a> ValuationModel<'a> {
    pub fn new(params: &'a EconomicParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &'a EconomicParameters {
        self.params
    }

    /// Value at horizon end of month `m`'s contribution when no crash happens
    ///
    /// A fraction `x` goes into the ETF and `1 - x` into cash; both compound
    /// from the contribution month through the end of the horizon.
    #[inline]
    pub fn no_crash_value(&self, month: u32, x: f64) -> Result<f64> {
        self.check_month(month)?;
        check_allocation(x)?;
        let p = self.params;
        let years = months_to_years(p.horizon_months() - month + 1);
        let budget = p.monthly_budget();

        let etf = budget * x * growth_factor(p.stock_annual_rate(), years);
        let cash = budget * (1.0 - x) * growth_factor(p.cash_annual_rate(), years);

        finite(etf + cash, Scenario::NoCrash, month)
    }

    /// Value at horizon end of month `m`'s contribution under `scenario`
    ///
    /// Before the crash month the contribution is split by `x`. At the crash
    /// the ETF leg loses `loss_fraction` of its value and stops compounding;
    /// the cash leg buys shares at the discounted price and grows at the
    /// cheap-stock rate until the horizon ends.
    ///
    /// From the crash month on, every contribution goes fully into the ETF and
    /// `x` is ignored.
    #[inline]
    pub fn crash_value(&self, scenario: &CrashScenario, month: u32, x: f64) -> Result<f64> {
        self.check_scenario(scenario)?;
        self.check_month(month)?;
        check_allocation(x)?;
        let p = self.params;
        let budget = p.monthly_budget();
        let crash_month = scenario.month();

        let value = if month < crash_month {
            let pre_years = months_to_years(crash_month - month);
            let post_years = months_to_years(p.horizon_months() - crash_month);

            let mut etf = budget * x * growth_factor(p.stock_annual_rate(), pre_years);
            let mut cash = budget * (1.0 - x) * growth_factor(p.cash_annual_rate(), pre_years);

            etf *= 1.0 - scenario.loss_fraction();
            cash *= scenario.cheap_share_multiplier();
            cash *= growth_factor(p.cheap_stock_annual_rate(), post_years);

            etf + cash
        } else {
            let years = months_to_years(p.horizon_months() - month + 1);
            budget * growth_factor(p.stock_annual_rate(), years)
        };

        finite(value, Scenario::Crash, month)
    }

    /// Reject a scenario built against a longer horizon than these parameters
    #[inline]
    pub fn check_scenario(&self, scenario: &CrashScenario) -> Result<()> {
        let horizon = self.params.horizon_months();
        if scenario.month() > horizon {
            return Err(AllocationError::invalid_parameter(
                "crash_month",
                format!("must be within [1, {horizon}], got {}", scenario.month()),
            ));
        }
        Ok(())
    }

    #[inline]
    fn check_month(&self, month: u32) -> Result<()> {
        let horizon = self.params.horizon_months();
        if month < 1 || month > horizon {
            return Err(AllocationError::invalid_parameter(
                "month",
                format!("must be within [1, {horizon}], got {month}"),
            ));
        }
        Ok(())
    }
}

/// Reject allocations outside [0, 1] (NaN included)
#[inline]
pub fn check_allocation(x: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&x) {
        return Err(AllocationError::invalid_parameter(
            "allocation",
            format!("must be within [0, 1], got {x}"),
        ));
    }
    Ok(())
}

#[inline]
fn finite(value: f64, scenario: Scenario, month: u32) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AllocationError::overflow_at(scenario, month))
    }
}
