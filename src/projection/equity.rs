//! Equity and loan-to-value position for a property in a projected year

use super::income::years_elapsed;
use crate::loan::balance_after;
use crate::money::{round_currency, round_lvr, saturate, saturating_sum};
use crate::records::LoanRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPosition {
    pub property_value: Decimal,
    pub total_debt: Decimal,
    pub equity: Decimal,
    /// Percentage, 2 dp
    pub lvr: Decimal,
}

/// `debt / value × 100` at 2 dp, or zero when there is no positive value
pub fn loan_to_value(total_debt: Decimal, property_value: Decimal) -> Decimal {
    if property_value <= Decimal::ZERO {
        return round_lvr(Decimal::ZERO);
    }
    let percent = total_debt
        .checked_div(property_value)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| saturate(total_debt));
    round_lvr(percent)
}

/// Debt outstanding across `loans` in `target_year`, each loan amortized
/// for the years elapsed since `base_year`.
pub fn total_debt_for_year(loans: &[LoanRecord], target_year: i32, base_year: i32, rate_offset: Decimal) -> Decimal {
    let elapsed = years_elapsed(target_year, base_year) as i32;
    saturating_sum(loans.iter().map(|loan| balance_after(loan, elapsed, rate_offset)))
}

/// Equity and LVR of a property worth `property_value` in `target_year`.
/// Equity can go negative when debt exceeds value.
pub fn calculate_property_equity(
    property_value: Decimal,
    loans: &[LoanRecord],
    target_year: i32,
    base_year: i32,
    rate_offset: Decimal,
) -> EquityPosition {
    let total_debt = total_debt_for_year(loans, target_year, base_year, rate_offset);

    EquityPosition {
        property_value: round_currency(property_value),
        total_debt: round_currency(total_debt),
        equity: round_currency(property_value.saturating_sub(total_debt)),
        lvr: loan_to_value(total_debt, property_value),
    }
}
