//! Month-by-month amortization schedule for a principal-and-interest loan

use super::amortization::{calculate_principal_and_interest_repayment, term_in_years};
use crate::money::{percent_to_fraction, round_currency, saturating_sum, Frequency, MONTHS_PER_YEAR};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scheduled monthly repayment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Decimal,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub total_payment: Decimal,
    pub closing_balance: Decimal,
    pub cumulative_interest: Decimal,
    pub cumulative_principal: Decimal,
}

/// Schedule rows folded into a loan year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    /// Loan year, 1-indexed
    pub year: u32,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub total_paid: Decimal,
    pub closing_balance: Decimal,
}

/// Build the monthly schedule for `principal − offset_balance`.
///
/// Interest each month is the opening balance times the monthly rate,
/// rounded to cents. The final row absorbs any rounding residue so the loan
/// closes at exactly zero. An effective principal of zero or less yields an
/// empty schedule. Terms are clamped the same way as the repayment formula.
pub fn generate_amortization_schedule(
    principal: Decimal,
    annual_interest_rate: Decimal,
    term_years: i32,
    offset_balance: Decimal,
) -> Vec<AmortizationRow> {
    let effective = principal.saturating_sub(offset_balance);
    if effective <= Decimal::ZERO {
        return Vec::new();
    }

    let term_years = term_in_years(term_years);
    let total_months = term_years * MONTHS_PER_YEAR;
    let monthly_rate = (percent_to_fraction(annual_interest_rate) / Decimal::from(MONTHS_PER_YEAR))
        .max(Decimal::ZERO);
    let payment = calculate_principal_and_interest_repayment(
        effective,
        annual_interest_rate,
        term_years as i32,
        Frequency::Monthly,
        Decimal::ZERO,
    )
    .payment_per_frequency;

    let mut schedule = Vec::with_capacity(total_months as usize);
    let mut balance = effective;
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;

    for month in 1..=total_months {
        let opening_balance = balance;
        let interest_paid = round_currency(opening_balance.saturating_mul(monthly_rate));
        let mut principal_paid = payment.saturating_sub(interest_paid);
        if month == total_months || principal_paid > opening_balance {
            principal_paid = opening_balance;
        }

        balance -= principal_paid;
        cumulative_interest = cumulative_interest.saturating_add(interest_paid);
        cumulative_principal = cumulative_principal.saturating_add(principal_paid);

        schedule.push(AmortizationRow {
            month,
            opening_balance: round_currency(opening_balance),
            principal_paid: round_currency(principal_paid),
            interest_paid,
            total_payment: round_currency(principal_paid.saturating_add(interest_paid)),
            closing_balance: round_currency(balance.max(Decimal::ZERO)),
            cumulative_interest: round_currency(cumulative_interest),
            cumulative_principal: round_currency(cumulative_principal),
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    schedule
}

/// Fold monthly rows into loan-year totals
pub fn summarize_by_year(schedule: &[AmortizationRow]) -> Vec<AmortizationYear> {
    schedule
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(index, months)| {
            let principal_paid = saturating_sum(months.iter().map(|r| r.principal_paid));
            let interest_paid = saturating_sum(months.iter().map(|r| r.interest_paid));
            AmortizationYear {
                year: index as u32 + 1,
                principal_paid: round_currency(principal_paid),
                interest_paid: round_currency(interest_paid),
                total_paid: round_currency(principal_paid.saturating_add(interest_paid)),
                closing_balance: months.last().map(|r| r.closing_balance).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::MAX_TERM_YEARS;
    use rust_decimal_macros::dec;

    #[test]
    fn test_schedule_runs_to_zero() {
        let schedule = generate_amortization_schedule(dec!(500000), dec!(6.0), 30, Decimal::ZERO);
        assert_eq!(schedule.len(), 360);

        let first = &schedule[0];
        assert_eq!(first.opening_balance, dec!(500000.00));
        assert_eq!(first.interest_paid, dec!(2500.00));
        assert_eq!(first.total_payment, dec!(2997.75));

        let last = schedule.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(last.cumulative_principal, dec!(500000.00));
    }

    #[test]
    fn test_interest_declines_over_time() {
        let schedule = generate_amortization_schedule(dec!(300000), dec!(5.5), 25, Decimal::ZERO);
        assert!(schedule[0].interest_paid > schedule[100].interest_paid);
        assert!(schedule[0].principal_paid < schedule[100].principal_paid);
    }

    #[test]
    fn test_offset_reduces_schedule_principal() {
        let schedule = generate_amortization_schedule(dec!(500000), dec!(6.0), 30, dec!(100000));
        assert_eq!(schedule[0].opening_balance, dec!(400000.00));
        assert_eq!(schedule[0].interest_paid, dec!(2000.00));
    }

    #[test]
    fn test_fully_offset_loan_has_no_schedule() {
        assert!(generate_amortization_schedule(dec!(200000), dec!(6.0), 30, dec!(200000)).is_empty());
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = generate_amortization_schedule(dec!(12000), Decimal::ZERO, 1, Decimal::ZERO);
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|r| r.interest_paid.is_zero()));
        assert!(schedule.iter().all(|r| r.principal_paid == dec!(1000.00)));
    }

    #[test]
    fn test_yearly_summary() {
        let schedule = generate_amortization_schedule(dec!(120000), dec!(4.0), 10, Decimal::ZERO);
        let years = summarize_by_year(&schedule);
        assert_eq!(years.len(), 10);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[0].closing_balance, schedule[11].closing_balance);
        assert_eq!(years[9].closing_balance, Decimal::ZERO);

        let principal_total: Decimal = years.iter().map(|y| y.principal_paid).sum();
        assert_eq!(principal_total, dec!(120000.00));
    }

    #[test]
    fn test_extreme_term_schedule_is_capped() {
        let schedule = generate_amortization_schedule(dec!(500000), dec!(6.0), i32::MAX, Decimal::ZERO);
        assert_eq!(schedule.len(), MAX_TERM_YEARS as usize * MONTHS_PER_YEAR as usize);
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
    }
}
