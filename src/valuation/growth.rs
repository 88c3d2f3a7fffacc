//! Compounding helpers

use crate::params::MONTHS_PER_YEAR;

/// Growth factor for `years` of annual compounding at `annual_rate`
///
/// Fractional years are compounded as `(1 + r)^t`. Zero years gives exactly 1.
#[inline]
pub fn growth_factor(annual_rate: f64, years: f64) -> f64 {
    (1.0 + annual_rate).powf(years)
}

/// Convert a month count into compounding years
#[inline]
pub fn months_to_years(months: u32) -> f64 {
    months as f64 / MONTHS_PER_YEAR
}
