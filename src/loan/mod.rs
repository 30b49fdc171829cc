//! Loan amortization: repayments, remaining balances, schedules and borrowing summaries

mod amortization;
mod mortgage;
mod schedule;

pub use amortization::{
    calculate_interest_only_repayment, calculate_loan_repayment,
    calculate_principal_and_interest_repayment, calculate_remaining_balance, RepaymentBreakdown,
};
pub use mortgage::{calculate_mortgage, estimate_lmi, MortgageInputs, MortgageSummary, LMI_THRESHOLD_LVR};
pub use schedule::{generate_amortization_schedule, summarize_by_year, AmortizationRow, AmortizationYear};

use crate::records::LoanRecord;
use rust_decimal::Decimal;

/// Repayment breakdown for a stored loan, on its balance net of offset
pub fn repayment_for(loan: &LoanRecord, rate_offset: Decimal) -> RepaymentBreakdown {
    calculate_loan_repayment(
        loan.net_principal(),
        loan.interest_rate,
        loan.structure,
        loan.remaining_term_years,
        loan.repayment_frequency,
        rate_offset,
    )
}

/// Balance of a stored loan, net of offset, after `years_elapsed` years
pub fn balance_after(loan: &LoanRecord, years_elapsed: i32, rate_offset: Decimal) -> Decimal {
    calculate_remaining_balance(
        loan.net_principal(),
        loan.interest_rate,
        loan.remaining_term_years,
        years_elapsed,
        loan.structure,
        rate_offset,
    )
}
