//! Project recurring rental income and operating expenses into a target year

use crate::money::{annualize, compound, round_currency, saturating_sum, WEEKS_PER_YEAR};
use crate::records::{ExpenseRecord, RentalIncomeRecord};
use rust_decimal::Decimal;

/// Whole years between the base and target year, never negative
pub(crate) fn years_elapsed(target_year: i32, base_year: i32) -> u32 {
    target_year.saturating_sub(base_year).max(0) as u32
}

/// Share of the year a property is let: `1 − vacancy_weeks/52`
fn occupancy(vacancy_weeks: Decimal) -> Decimal {
    Decimal::ONE.saturating_sub(vacancy_weeks / WEEKS_PER_YEAR)
}

/// Rental income for `target_year`.
///
/// Each record is annualized, compounded at its own growth rate for the
/// elapsed years and reduced for vacancy. Record validity dates are not
/// consulted. An empty list yields zero.
pub fn calculate_rental_income_for_year(
    records: &[RentalIncomeRecord],
    target_year: i32,
    base_year: i32,
) -> Decimal {
    let elapsed = years_elapsed(target_year, base_year);

    let total = saturating_sum(records.iter().map(|record| {
        let grown = compound(annualize(record.amount, record.frequency), record.growth_rate, elapsed);
        grown.saturating_mul(occupancy(record.vacancy_weeks_per_year))
    }));

    round_currency(total)
}

/// Operating expenses for `target_year`.
///
/// `growth_override`, when set, replaces every record's own growth rate.
pub fn calculate_expenses_for_year(
    records: &[ExpenseRecord],
    target_year: i32,
    base_year: i32,
    growth_override: Option<Decimal>,
) -> Decimal {
    let elapsed = years_elapsed(target_year, base_year);

    let total = saturating_sum(records.iter().map(|record| {
        let rate = growth_override.unwrap_or(record.growth_rate);
        compound(annualize(record.amount, record.frequency), rate, elapsed)
    }));

    round_currency(total)
}
