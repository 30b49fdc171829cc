//! Loan repayment and remaining-balance formulas
//!
//! Rates are percentages (6.25 for 6.25%). A scenario `rate_offset` in
//! percentage points is added to the stated rate before anything else.
//! Every step is checked: inputs too large for the decimal range degrade to
//! a defined fallback instead of panicking.

use crate::assumptions::MAX_TERM_YEARS;
use crate::money::{checked_power, percent_to_fraction, round_currency, saturate, Frequency, MONTHS_PER_YEAR};
use crate::records::LoanStructure;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Repayment amounts for one loan, each rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepaymentBreakdown {
    pub monthly_payment: Decimal,
    pub annual_payment: Decimal,
    /// Principal repaid in the first period
    pub principal_portion: Decimal,
    /// Interest charged in the first period
    pub interest_portion: Decimal,
    /// Payment at the loan's own repayment frequency
    pub payment_per_frequency: Decimal,
}

/// Loan term in whole years, at least one and at most [`MAX_TERM_YEARS`]
pub(crate) fn term_in_years(term_years: i32) -> u32 {
    term_years.clamp(1, MAX_TERM_YEARS) as u32
}

/// Interest-only repayment: `annual = principal × rate / 100`, no principal reduction
pub fn calculate_interest_only_repayment(
    principal: Decimal,
    annual_interest_rate: Decimal,
    frequency: Frequency,
    rate_offset: Decimal,
) -> RepaymentBreakdown {
    let rate = annual_interest_rate.saturating_add(rate_offset);
    let annual_interest = principal.saturating_mul(percent_to_fraction(rate));
    let payment = annual_interest / frequency.multiplier();

    RepaymentBreakdown {
        monthly_payment: round_currency(annual_interest / Decimal::from(MONTHS_PER_YEAR)),
        annual_payment: round_currency(annual_interest),
        principal_portion: Decimal::ZERO,
        interest_portion: round_currency(payment),
        payment_per_frequency: round_currency(payment),
    }
}

/// Principal-and-interest repayment using the standard amortization formula
/// `M = P × i(1+i)^n / ((1+i)^n − 1)` at the loan's repayment frequency.
///
/// A zero or negative periodic rate falls back to straight-line repayment
/// `M = P / n`. A non-positive term is treated as one year and a term beyond
/// [`MAX_TERM_YEARS`] as that many years.
pub fn calculate_principal_and_interest_repayment(
    principal: Decimal,
    annual_interest_rate: Decimal,
    term_years: i32,
    frequency: Frequency,
    rate_offset: Decimal,
) -> RepaymentBreakdown {
    let rate = annual_interest_rate.saturating_add(rate_offset);
    let term_years = term_in_years(term_years);

    let multiplier = frequency.multiplier();
    let total_periods = term_years * frequency.periods_per_year();
    let periodic_rate = percent_to_fraction(rate) / multiplier;

    if periodic_rate <= Decimal::ZERO {
        let periodic_payment = principal / Decimal::from(total_periods);
        let monthly_payment = principal / Decimal::from(term_years * MONTHS_PER_YEAR);
        return RepaymentBreakdown {
            monthly_payment: round_currency(monthly_payment),
            annual_payment: round_currency(monthly_payment.saturating_mul(Decimal::from(MONTHS_PER_YEAR))),
            principal_portion: round_currency(periodic_payment),
            interest_portion: Decimal::ZERO,
            payment_per_frequency: round_currency(periodic_payment),
        };
    }

    let periodic_payment = amortized_payment(principal, periodic_rate, total_periods);

    let first_interest = principal.saturating_mul(periodic_rate);
    let first_principal = periodic_payment.saturating_sub(first_interest);

    let annual_payment = periodic_payment.saturating_mul(multiplier);
    let monthly_payment = annual_payment / Decimal::from(MONTHS_PER_YEAR);

    RepaymentBreakdown {
        monthly_payment: round_currency(monthly_payment),
        annual_payment: round_currency(annual_payment),
        principal_portion: round_currency(first_principal),
        interest_portion: round_currency(first_interest),
        payment_per_frequency: round_currency(periodic_payment),
    }
}

/// Level payment per period for a positive periodic rate.
///
/// Written as `P × i × f/(f − 1)` with `f = (1+i)^n` so the intermediate
/// product never exceeds the principal by more than the rate. If `f` itself
/// overflows the payment has converged on the interest-only amount `P × i`;
/// if `f` is indistinguishable from one the rate is negligible and the loan
/// repays in a straight line.
pub(crate) fn amortized_payment(principal: Decimal, periodic_rate: Decimal, periods: u32) -> Decimal {
    let Some(factor) = checked_power(Decimal::ONE + periodic_rate, periods) else {
        log::warn!(
            "Amortization factor overflowed for rate {} over {} periods; using interest-only payment",
            periodic_rate, periods
        );
        return principal.saturating_mul(periodic_rate);
    };

    let growth = factor - Decimal::ONE;
    if growth <= Decimal::ZERO {
        return principal / Decimal::from(periods.max(1));
    }

    match factor
        .checked_div(growth)
        .and_then(|ratio| principal.checked_mul(periodic_rate)?.checked_mul(ratio))
    {
        Some(payment) => payment,
        None => {
            log::warn!("Repayment on {} at periodic rate {} overflowed; saturating", principal, periodic_rate);
            saturate(principal)
        }
    }
}

/// Repayment for a loan, dispatched on its structure
pub fn calculate_loan_repayment(
    principal: Decimal,
    annual_interest_rate: Decimal,
    structure: LoanStructure,
    term_years: i32,
    frequency: Frequency,
    rate_offset: Decimal,
) -> RepaymentBreakdown {
    match structure {
        LoanStructure::InterestOnly => {
            calculate_interest_only_repayment(principal, annual_interest_rate, frequency, rate_offset)
        }
        LoanStructure::PrincipalAndInterest => calculate_principal_and_interest_repayment(
            principal,
            annual_interest_rate,
            term_years,
            frequency,
            rate_offset,
        ),
    }
}

/// Balance outstanding after `years_elapsed` whole years of scheduled repayments.
///
/// Always tracked on a monthly basis regardless of the loan's repayment
/// frequency: `B = A(1+i)^k − M((1+i)^k − 1)/i` with `i` the monthly rate and
/// `k` the months elapsed. Interest-only balances never reduce. The result is
/// floored at zero and rounded to cents. If any step leaves the decimal
/// range, nothing is taken to have been repaid.
pub fn calculate_remaining_balance(
    original_principal: Decimal,
    annual_interest_rate: Decimal,
    total_term_years: i32,
    years_elapsed: i32,
    structure: LoanStructure,
    rate_offset: Decimal,
) -> Decimal {
    let floored = |balance: Decimal| round_currency(balance.max(Decimal::ZERO));

    if structure == LoanStructure::InterestOnly || years_elapsed <= 0 {
        return floored(original_principal);
    }

    let term_years = term_in_years(total_term_years);
    if years_elapsed >= total_term_years || years_elapsed as u32 >= term_years {
        return floored(Decimal::ZERO);
    }

    let rate = annual_interest_rate.saturating_add(rate_offset);
    let monthly_rate = percent_to_fraction(rate) / Decimal::from(MONTHS_PER_YEAR);
    let total_months = term_years * MONTHS_PER_YEAR;
    let months_elapsed = years_elapsed as u32 * MONTHS_PER_YEAR;

    if monthly_rate <= Decimal::ZERO {
        let monthly_principal = original_principal / Decimal::from(total_months);
        let repaid = monthly_principal.saturating_mul(Decimal::from(months_elapsed));
        return floored(original_principal.saturating_sub(repaid));
    }

    let growth = Decimal::ONE + monthly_rate;
    let (Some(_), Some(elapsed_factor)) = (
        checked_power(growth, total_months),
        checked_power(growth, months_elapsed),
    ) else {
        // Payment has converged on pure interest, so nothing is repaid
        return floored(original_principal);
    };

    let monthly_payment = amortized_payment(original_principal, monthly_rate, total_months);
    let balance = original_principal.checked_mul(elapsed_factor).and_then(|accrued| {
        let repaid = monthly_payment
            .checked_mul(elapsed_factor - Decimal::ONE)?
            .checked_div(monthly_rate)?;
        accrued.checked_sub(repaid)
    });

    match balance {
        Some(balance) => floored(balance),
        None => {
            log::warn!(
                "Remaining balance on {} at {}% overflowed; treating the principal as unpaid",
                original_principal, rate
            );
            floored(original_principal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_io_calculation() {
        let result = calculate_interest_only_repayment(dec!(500000), dec!(6.0), Frequency::Monthly, Decimal::ZERO);
        assert_eq!(result.annual_payment, dec!(30000.00));
        assert_eq!(result.monthly_payment, dec!(2500.00));
        assert_eq!(result.principal_portion, Decimal::ZERO);
        assert_eq!(result.interest_portion, dec!(2500.00));
    }

    #[test]
    fn test_io_with_rate_offset() {
        let result = calculate_interest_only_repayment(dec!(500000), dec!(6.0), Frequency::Monthly, dec!(2.0));
        assert_eq!(result.annual_payment, dec!(40000.00));
    }

    #[test]
    fn test_io_weekly_frequency() {
        let result = calculate_interest_only_repayment(dec!(500000), dec!(6.0), Frequency::Weekly, Decimal::ZERO);
        assert_eq!(result.payment_per_frequency, dec!(576.92));
        assert_eq!(result.annual_payment, dec!(30000.00));
    }

    #[test]
    fn test_io_zero_principal() {
        let result = calculate_interest_only_repayment(Decimal::ZERO, dec!(6.0), Frequency::Monthly, Decimal::ZERO);
        assert_eq!(result.monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_basic_pi_calculation() {
        let result = calculate_principal_and_interest_repayment(
            dec!(500000), dec!(6.0), 30, Frequency::Monthly, Decimal::ZERO,
        );
        assert_eq!(result.monthly_payment, dec!(2997.75));
        assert_eq!(result.interest_portion, dec!(2500.00));
        assert_eq!(result.principal_portion, dec!(497.75));
    }

    #[test]
    fn test_pi_zero_interest() {
        let result = calculate_principal_and_interest_repayment(
            dec!(120000), Decimal::ZERO, 10, Frequency::Monthly, Decimal::ZERO,
        );
        assert_eq!(result.monthly_payment, dec!(1000.00));
        assert_eq!(result.annual_payment, dec!(12000.00));
        assert_eq!(result.interest_portion, Decimal::ZERO);
    }

    #[test]
    fn test_pi_zero_interest_any_term() {
        for term in [1, 7, 25, 30] {
            let principal = dec!(360000);
            let result = calculate_principal_and_interest_repayment(
                principal, Decimal::ZERO, term, Frequency::Monthly, Decimal::ZERO,
            );
            let expected = round_currency(principal / Decimal::from(term * 12));
            assert_eq!(result.monthly_payment, expected);
        }
    }

    #[test]
    fn test_pi_negative_effective_rate_is_linear() {
        let result = calculate_principal_and_interest_repayment(
            dec!(120000), dec!(1.0), 10, Frequency::Monthly, dec!(-2.0),
        );
        assert_eq!(result.monthly_payment, dec!(1000.00));
        assert_eq!(result.interest_portion, Decimal::ZERO);
    }

    #[test]
    fn test_pi_short_term() {
        let result = calculate_principal_and_interest_repayment(
            dec!(100000), dec!(5.0), 5, Frequency::Monthly, Decimal::ZERO,
        );
        assert!(result.monthly_payment > dec!(1880) && result.monthly_payment < dec!(1900));
    }

    #[test]
    fn test_pi_non_positive_term_treated_as_one_year() {
        let zero_term = calculate_principal_and_interest_repayment(
            dec!(12000), Decimal::ZERO, 0, Frequency::Monthly, Decimal::ZERO,
        );
        assert_eq!(zero_term.monthly_payment, dec!(1000.00));
    }

    #[test]
    fn test_pi_fortnightly_annual_close_to_monthly() {
        let monthly = calculate_principal_and_interest_repayment(
            dec!(500000), dec!(6.0), 30, Frequency::Monthly, Decimal::ZERO,
        );
        let fortnightly = calculate_principal_and_interest_repayment(
            dec!(500000), dec!(6.0), 30, Frequency::Fortnightly, Decimal::ZERO,
        );
        // Same rate compounding more often costs slightly less per year
        assert!(fortnightly.annual_payment < monthly.annual_payment);
        assert!(monthly.annual_payment - fortnightly.annual_payment < dec!(100));
    }

    #[test]
    fn test_dispatch_on_structure() {
        let io = calculate_loan_repayment(
            dec!(400000), dec!(6.0), LoanStructure::InterestOnly, 30, Frequency::Monthly, Decimal::ZERO,
        );
        assert_eq!(io.annual_payment, dec!(24000.00));

        let pi = calculate_loan_repayment(
            dec!(400000), dec!(6.0), LoanStructure::PrincipalAndInterest, 30, Frequency::Monthly, Decimal::ZERO,
        );
        assert!(pi.annual_payment > io.annual_payment);
    }

    #[test]
    fn test_io_balance_unchanged() {
        for years in [0, 1, 10, 30, 45] {
            let balance = calculate_remaining_balance(
                dec!(500000), dec!(6.0), 30, years, LoanStructure::InterestOnly, Decimal::ZERO,
            );
            assert_eq!(balance, dec!(500000.00));
        }
    }

    #[test]
    fn test_pi_balance_reduces() {
        let balance = calculate_remaining_balance(
            dec!(500000), dec!(6.0), 30, 10, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert!(balance > dec!(400000) && balance < dec!(420000), "balance was {}", balance);
    }

    #[test]
    fn test_fully_paid_after_term() {
        for years in [30, 31, 60] {
            let balance = calculate_remaining_balance(
                dec!(500000), dec!(6.0), 30, years, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
            );
            assert_eq!(balance, Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_years_elapsed() {
        let balance = calculate_remaining_balance(
            dec!(500000), dec!(6.0), 30, 0, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, dec!(500000.00));
    }

    #[test]
    fn test_zero_rate_linear_paydown() {
        let balance = calculate_remaining_balance(
            dec!(120000), Decimal::ZERO, 10, 4, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, dec!(72000.00));
    }

    #[test]
    fn test_rate_shock_slows_paydown() {
        let base = calculate_remaining_balance(
            dec!(500000), dec!(6.0), 30, 10, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        let shocked = calculate_remaining_balance(
            dec!(500000), dec!(6.0), 30, 10, LoanStructure::PrincipalAndInterest, dec!(3.0),
        );
        assert!(shocked > base);
    }

    #[test]
    fn test_negative_net_principal_floors_at_zero() {
        let balance = calculate_remaining_balance(
            dec!(-5000), dec!(6.0), 30, 5, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn test_absurd_rate_does_not_panic() {
        let balance = calculate_remaining_balance(
            dec!(100000), dec!(5000), 50, 10, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, dec!(100000.00));
    }

    #[test]
    fn test_balance_overflow_late_in_term_keeps_principal() {
        // Both powers fit but the accrued principal does not
        let balance = calculate_remaining_balance(
            dec!(700000), dec!(220), 30, 29, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, dec!(700000.00));
    }

    #[test]
    fn test_extreme_term_repayment_treated_as_max_term() {
        let huge = calculate_principal_and_interest_repayment(
            dec!(500000), dec!(6.0), 100_000_000, Frequency::Weekly, Decimal::ZERO,
        );
        let capped = calculate_principal_and_interest_repayment(
            dec!(500000), dec!(6.0), MAX_TERM_YEARS, Frequency::Weekly, Decimal::ZERO,
        );
        assert_eq!(huge, capped);
        // A millennium of weekly payments is interest-only in all but name
        assert_eq!(huge.payment_per_frequency, dec!(576.92));
    }

    #[test]
    fn test_extreme_term_balance_treated_as_max_term() {
        let huge = calculate_remaining_balance(
            dec!(500000), dec!(6.0), 400_000_000, 5, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        let capped = calculate_remaining_balance(
            dec!(500000), dec!(6.0), MAX_TERM_YEARS, 5, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(huge, capped);
        assert_eq!(huge, dec!(500000.00));
    }

    #[test]
    fn test_elapsed_beyond_capped_term_is_paid_off() {
        let balance = calculate_remaining_balance(
            dec!(500000), dec!(6.0), i32::MAX, i32::MAX - 1, LoanStructure::PrincipalAndInterest, Decimal::ZERO,
        );
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_principal_repayment_saturates() {
        let repayment = calculate_principal_and_interest_repayment(
            Decimal::MAX, dec!(6.0), 30, Frequency::Monthly, Decimal::ZERO,
        );
        assert!(repayment.payment_per_frequency > Decimal::ZERO);
        let io = calculate_interest_only_repayment(Decimal::MAX, Decimal::MAX, Frequency::Monthly, dec!(1));
        assert_eq!(io.annual_payment, round_currency(Decimal::MAX));
    }
}
