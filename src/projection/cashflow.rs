//! Annual cash position of a property

use crate::loan::repayment_for;
use crate::money::{round_currency, saturating_sum};
use crate::records::LoanRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowPosition {
    pub rental_income: Decimal,
    pub loan_repayments: Decimal,
    pub expenses: Decimal,
    /// Reported alongside the cashflow; never subtracted from it
    pub depreciation: Decimal,
    pub net_cashflow: Decimal,
}

/// Annual loan repayments across `loans`, summing each loan's rounded annual payment
pub fn annual_loan_repayments(loans: &[LoanRecord], rate_offset: Decimal) -> Decimal {
    saturating_sum(loans.iter().map(|loan| repayment_for(loan, rate_offset).annual_payment))
}

/// Net cashflow is `rental_income − loan_repayments − expenses`.
pub fn calculate_property_cashflow(
    loans: &[LoanRecord],
    rental_income: Decimal,
    expenses: Decimal,
    depreciation: Decimal,
    rate_offset: Decimal,
) -> CashflowPosition {
    let loan_repayments = annual_loan_repayments(loans, rate_offset);

    CashflowPosition {
        rental_income: round_currency(rental_income),
        loan_repayments: round_currency(loan_repayments),
        expenses: round_currency(expenses),
        depreciation: round_currency(depreciation),
        net_cashflow: round_currency(rental_income.saturating_sub(loan_repayments).saturating_sub(expenses)),
    }
}
