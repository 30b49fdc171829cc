//! Project a property's value forward by compounding resolved growth rates

use super::growth::growth_rate_for_year;
use crate::money::{growth_factor, round_currency, saturate};
use crate::records::{GrowthRatePeriod, Valuation};
use chrono::Datelike;
use rust_decimal::Decimal;

/// Most recent valuation by date; on equal dates the later entry in the list wins
pub fn latest_valuation(valuations: &[Valuation]) -> Option<&Valuation> {
    valuations.iter().max_by_key(|v| v.date)
}

/// Value of a property in `target_year`.
///
/// The latest valuation, when there is one, replaces `base_value` and its
/// year replaces `base_year`. Growth is then applied once for each year in
/// `[base_year, target_year)`, so a target equal to the base year returns the
/// base value unchanged.
pub fn calculate_property_value(
    base_value: Decimal,
    base_year: i32,
    target_year: i32,
    growth_periods: &[GrowthRatePeriod],
    valuations: &[Valuation],
) -> Decimal {
    let (mut current_value, base_year) = match latest_valuation(valuations) {
        Some(valuation) => (valuation.value, valuation.date.year()),
        None => (base_value, base_year),
    };

    for year in base_year..target_year {
        let factor = growth_factor(growth_rate_for_year(year, growth_periods));
        current_value = match current_value.checked_mul(factor) {
            Some(value) => value,
            None => {
                log::warn!("Property value overflowed compounding year {}; saturating", year);
                return saturate(current_value);
            }
        };
    }

    round_currency(current_value)
}
