//! Resolve the capital growth rate that applies to a given year

use crate::assumptions::DEFAULT_GROWTH_RATE;
use crate::records::GrowthRatePeriod;
use rust_decimal::Decimal;

/// Rate (%) for `year` from an ordered list of periods.
///
/// The first period whose inclusive range contains `year` wins. When none
/// match, the *last* period in the list is used, whatever its range. An empty
/// list yields `default_rate`.
pub fn get_growth_rate_for_year(year: i32, periods: &[GrowthRatePeriod], default_rate: Decimal) -> Decimal {
    let Some(last) = periods.last() else {
        return default_rate;
    };

    periods
        .iter()
        .find(|period| period.contains(year))
        .unwrap_or(last)
        .rate
}

/// [`get_growth_rate_for_year`] with the standard 5% default
pub fn growth_rate_for_year(year: i32, periods: &[GrowthRatePeriod]) -> Decimal {
    get_growth_rate_for_year(year, periods, DEFAULT_GROWTH_RATE)
}
