//! Probability-weighted terminal value over the whole contribution horizon

use serde::Serialize;

use crate::error::{AllocationError, Result, Scenario};
use crate::params::{CrashScenario, EconomicParameters};
use crate::valuation::{check_allocation, ValuationModel};

/// Horizon totals for both scenarios at one allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioTotals {
    pub no_crash: f64,
    pub crash: f64,
}

impl ScenarioTotals {
    /// `p * crash + (1 - p) * no_crash`
    #[inline]
    pub fn expected(&self, crash_probability: f64) -> f64 {
        crash_probability * self.crash + (1.0 - crash_probability) * self.no_crash
    }
}

/// Sum every month's contribution value under both scenarios
///
/// `x` must lie in [0, 1] and `scenario` must fit within the horizon of
/// `params`.
pub fn scenario_totals(params: &EconomicParameters, x: f64, scenario: &CrashScenario) -> Result<ScenarioTotals> {
    let model = ValuationModel::new(params);
    model.check_scenario(scenario)?;
    check_allocation(x)?;
    let mut no_crash = 0.0;
    let mut crash = 0.0;

    for month in 1..=params.horizon_months() {
        no_crash += model.no_crash_value(month, x)?;
        crash += model.crash_value(scenario, month, x)?;
    }

    if !no_crash.is_finite() {
        return Err(AllocationError::overflow_total(Scenario::NoCrash));
    }
    if !crash.is_finite() {
        return Err(AllocationError::overflow_total(Scenario::Crash));
    }

    Ok(ScenarioTotals { no_crash, crash })
}

/// Expected terminal value at allocation `x` under the ambient crash scenario
pub fn expected_total_value(params: &EconomicParameters, x: f64) -> Result<f64> {
    expected_total_value_at(params, x, params.crash())
}

/// Expected terminal value at allocation `x` with the crash probability, month
/// and loss taken from `scenario` instead of `params`
pub fn expected_total_value_at(params: &EconomicParameters, x: f64, scenario: &CrashScenario) -> Result<f64> {
    let totals = scenario_totals(params, x, scenario)?;
    Ok(totals.expected(scenario.probability()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EconomicInputs;
    use approx::assert_relative_eq;

    fn params(f: impl FnOnce(&mut EconomicInputs)) -> EconomicParameters {
        let mut inputs = EconomicInputs::default();
        f(&mut inputs);
        EconomicParameters::new(inputs).unwrap()
    }

    #[test]
    fn test_probability_extremes_reduce_to_pure_scenarios() {
        let base = EconomicParameters::reference();
        let totals = scenario_totals(&base, 0.6, base.crash()).unwrap();

        let never = params(|i| i.crash_probability = 0.0);
        assert_eq!(expected_total_value(&never, 0.6).unwrap(), totals.no_crash);

        let always = params(|i| i.crash_probability = 1.0);
        assert_eq!(expected_total_value(&always, 0.6).unwrap(), totals.crash);
    }

    #[test]
    fn test_single_month_horizon() {
        let p = params(|i| {
            i.horizon_months = 1;
            i.crash_month = 1;
        });
        // Only contribution is at the crash month: fully invested under crash
        let totals = scenario_totals(&p, 0.0, p.crash()).unwrap();
        assert_relative_eq!(totals.crash, 500.0 * 1.10_f64.powf(1.0 / 12.0), epsilon = 1e-9);
        assert_relative_eq!(totals.no_crash, 500.0 * 1.0275_f64.powf(1.0 / 12.0), epsilon = 1e-9);

        let expected = expected_total_value(&p, 0.0).unwrap();
        assert_relative_eq!(expected, 0.5 * totals.crash + 0.5 * totals.no_crash, epsilon = 1e-9);
    }

    #[test]
    fn test_override_leaves_no_crash_branch_untouched() {
        let p = EconomicParameters::reference();
        let ambient = scenario_totals(&p, 0.5, p.crash()).unwrap();

        let harsh = p.scenario(3, 0.5, 0.9).unwrap();
        let overridden = scenario_totals(&p, 0.5, &harsh).unwrap();

        assert_eq!(ambient.no_crash, overridden.no_crash);
        assert_ne!(ambient.crash, overridden.crash);

        let value = expected_total_value_at(&p, 0.5, &harsh).unwrap();
        assert_relative_eq!(
            value,
            0.9 * overridden.crash + 0.1 * overridden.no_crash,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_ambient_equals_explicit_ambient_override() {
        let p = EconomicParameters::reference();
        let explicit = p.scenario(12, 0.30, 0.50).unwrap();
        for x in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(
                expected_total_value(&p, x).unwrap(),
                expected_total_value_at(&p, x, &explicit).unwrap()
            );
        }
    }

    #[test]
    fn test_reference_boundary_values() {
        let p = EconomicParameters::reference();
        assert_relative_eq!(expected_total_value(&p, 0.0).unwrap(), 14_388.845_066_818_99, epsilon = 1e-6);
        assert_relative_eq!(expected_total_value(&p, 1.0).unwrap(), 12_093.202_670_268_52, epsilon = 1e-6);
    }

    #[test]
    fn test_scenario_beyond_horizon_is_rejected() {
        let p = EconomicParameters::reference();
        let foreign = CrashScenario::new(30, 0.3, 0.5, 60).unwrap();
        assert!(matches!(
            expected_total_value_at(&p, 0.5, &foreign),
            Err(AllocationError::InvalidParameter { name: "crash_month", .. })
        ));
    }

    #[test]
    fn test_allocation_outside_unit_interval_is_rejected() {
        let p = EconomicParameters::reference();
        for x in [-0.5, 1.5, 2.0] {
            assert!(matches!(
                expected_total_value(&p, x),
                Err(AllocationError::InvalidParameter { name: "allocation", .. })
            ));
        }
    }
}
