//! Borrowing summary for a prospective purchase: LVR, LMI estimate, repayments and lifetime interest

use super::amortization::{
    calculate_interest_only_repayment, calculate_principal_and_interest_repayment, term_in_years,
};
use crate::money::{round_currency, round_lvr, saturate, Frequency, MONTHS_PER_YEAR};
use crate::records::LoanStructure;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// LVR above which lenders mortgage insurance is assumed to apply
pub const LMI_THRESHOLD_LVR: Decimal = dec!(80);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub purchase_price: Decimal,
    pub deposit: Decimal,
    /// Annual rate as a percentage
    pub interest_rate: Decimal,
    pub loan_term_years: i32,
    pub structure: LoanStructure,
    /// For interest-only loans, years before reverting to P&I. Zero means interest-only for the whole term.
    #[serde(default)]
    pub interest_only_period_years: i32,
    #[serde(default)]
    pub offset_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageSummary {
    pub loan_amount: Decimal,
    pub lvr: Decimal,
    pub monthly_repayment: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub total_repayments: Decimal,
    pub total_interest: Decimal,
    pub requires_lmi: bool,
    pub estimated_lmi: Option<Decimal>,
}

/// Simplified LMI premium: a flat share of the loan by LVR band
pub fn estimate_lmi(loan_amount: Decimal, lvr: Decimal) -> Decimal {
    if lvr <= LMI_THRESHOLD_LVR {
        return Decimal::ZERO;
    }
    let rate = if lvr <= dec!(85) {
        dec!(0.01)
    } else if lvr <= dec!(90) {
        dec!(0.02)
    } else if lvr <= dec!(95) {
        dec!(0.03)
    } else {
        dec!(0.04)
    };
    round_currency(loan_amount.saturating_mul(rate))
}

/// Summarise a prospective mortgage.
///
/// Repayments are computed on the loan net of any offset balance. An
/// interest-only loan with an IO period shorter than the term switches to
/// P&I over the remaining years.
pub fn calculate_mortgage(inputs: &MortgageInputs) -> MortgageSummary {
    let loan_amount = inputs.purchase_price.saturating_sub(inputs.deposit);
    let lvr = if inputs.purchase_price > Decimal::ZERO {
        let percent = loan_amount
            .checked_div(inputs.purchase_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| saturate(loan_amount));
        round_lvr(percent)
    } else {
        round_lvr(Decimal::ZERO)
    };

    let requires_lmi = lvr > LMI_THRESHOLD_LVR;
    let estimated_lmi = requires_lmi.then(|| estimate_lmi(loan_amount, lvr));

    let effective = loan_amount.saturating_sub(inputs.offset_balance).max(Decimal::ZERO);
    let term_years = term_in_years(inputs.loan_term_years);
    let term_months = Decimal::from(term_years * MONTHS_PER_YEAR);
    let term_years = term_years as i32;

    let (monthly_repayment, principal_portion, interest_portion, total_repayments, total_interest) =
        match inputs.structure {
            LoanStructure::InterestOnly => {
                let io = calculate_interest_only_repayment(
                    effective,
                    inputs.interest_rate,
                    Frequency::Monthly,
                    Decimal::ZERO,
                );
                let io_years = inputs.interest_only_period_years;
                if io_years > 0 && io_years < term_years {
                    let io_months = Decimal::from(io_years as u32 * MONTHS_PER_YEAR);
                    let pi_years = term_years - io_years;
                    let pi = calculate_principal_and_interest_repayment(
                        effective,
                        inputs.interest_rate,
                        pi_years,
                        Frequency::Monthly,
                        Decimal::ZERO,
                    );
                    let pi_months = Decimal::from(pi_years as u32 * MONTHS_PER_YEAR);
                    let total = io
                        .monthly_payment
                        .saturating_mul(io_months)
                        .saturating_add(pi.monthly_payment.saturating_mul(pi_months));
                    (io.monthly_payment, Decimal::ZERO, io.monthly_payment, total, total.saturating_sub(effective))
                } else {
                    let total = io.monthly_payment.saturating_mul(term_months);
                    (io.monthly_payment, Decimal::ZERO, io.monthly_payment, total, total)
                }
            }
            LoanStructure::PrincipalAndInterest => {
                let pi = calculate_principal_and_interest_repayment(
                    effective,
                    inputs.interest_rate,
                    term_years,
                    Frequency::Monthly,
                    Decimal::ZERO,
                );
                let total = pi.monthly_payment.saturating_mul(term_months);
                (pi.monthly_payment, pi.principal_portion, pi.interest_portion, total, total.saturating_sub(effective))
            }
        };

    MortgageSummary {
        loan_amount: round_currency(loan_amount),
        lvr,
        monthly_repayment,
        principal_portion,
        interest_portion,
        total_repayments: round_currency(total_repayments),
        total_interest: round_currency(total_interest),
        requires_lmi,
        estimated_lmi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(deposit: Decimal, structure: LoanStructure) -> MortgageInputs {
        MortgageInputs {
            purchase_price: dec!(800000),
            deposit,
            interest_rate: dec!(6.0),
            loan_term_years: 30,
            structure,
            interest_only_period_years: 0,
            offset_balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_pi_mortgage_without_lmi() {
        let summary = calculate_mortgage(&inputs(dec!(300000), LoanStructure::PrincipalAndInterest));
        assert_eq!(summary.loan_amount, dec!(500000.00));
        assert_eq!(summary.lvr, dec!(62.50));
        assert_eq!(summary.monthly_repayment, dec!(2997.75));
        assert!(!summary.requires_lmi);
        assert_eq!(summary.estimated_lmi, None);
        assert_eq!(summary.total_repayments, dec!(1079190.00));
        assert_eq!(summary.total_interest, dec!(579190.00));
    }

    #[test]
    fn test_high_lvr_requires_lmi() {
        let summary = calculate_mortgage(&inputs(dec!(60000), LoanStructure::PrincipalAndInterest));
        assert_eq!(summary.lvr, dec!(92.50));
        assert!(summary.requires_lmi);
        assert_eq!(summary.estimated_lmi, Some(dec!(22200.00)));
    }

    #[test]
    fn test_lmi_bands() {
        assert_eq!(estimate_lmi(dec!(100000), dec!(80)), Decimal::ZERO);
        assert_eq!(estimate_lmi(dec!(100000), dec!(84.99)), dec!(1000.00));
        assert_eq!(estimate_lmi(dec!(100000), dec!(90)), dec!(2000.00));
        assert_eq!(estimate_lmi(dec!(100000), dec!(95)), dec!(3000.00));
        assert_eq!(estimate_lmi(dec!(100000), dec!(97)), dec!(4000.00));
    }

    #[test]
    fn test_pure_interest_only() {
        let summary = calculate_mortgage(&inputs(dec!(300000), LoanStructure::InterestOnly));
        assert_eq!(summary.monthly_repayment, dec!(2500.00));
        assert_eq!(summary.principal_portion, Decimal::ZERO);
        assert_eq!(summary.total_interest, dec!(900000.00));
    }

    #[test]
    fn test_interest_only_then_pi() {
        let mut hybrid = inputs(dec!(300000), LoanStructure::InterestOnly);
        hybrid.interest_only_period_years = 5;
        let summary = calculate_mortgage(&hybrid);

        let pure_pi = calculate_mortgage(&inputs(dec!(300000), LoanStructure::PrincipalAndInterest));
        assert_eq!(summary.monthly_repayment, dec!(2500.00));
        assert!(summary.total_interest > pure_pi.total_interest);
    }

    #[test]
    fn test_zero_price_guards_lvr() {
        let mut zero = inputs(Decimal::ZERO, LoanStructure::PrincipalAndInterest);
        zero.purchase_price = Decimal::ZERO;
        let summary = calculate_mortgage(&zero);
        assert_eq!(summary.lvr, Decimal::ZERO);
        assert!(!summary.requires_lmi);
    }
    #[test]
    fn test_extreme_term_mortgage_is_capped() {
        let mut long = inputs(dec!(300000), LoanStructure::InterestOnly);
        long.loan_term_years = i32::MAX;
        long.interest_only_period_years = 5;
        let summary = calculate_mortgage(&long);
        assert_eq!(summary.monthly_repayment, dec!(2500.00));
        assert!(summary.total_repayments > Decimal::ZERO);

        let mut pi = inputs(dec!(300000), LoanStructure::PrincipalAndInterest);
        pi.loan_term_years = i32::MAX;
        assert!(calculate_mortgage(&pi).total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_tiny_price_pins_lvr() {
        let mut tiny = inputs(Decimal::ZERO, LoanStructure::PrincipalAndInterest);
        tiny.purchase_price = dec!(0.0001);
        tiny.deposit = -Decimal::MAX;
        let summary = calculate_mortgage(&tiny);
        assert_eq!(summary.lvr, round_lvr(Decimal::MAX));
        assert!(summary.requires_lmi);
    }
}
