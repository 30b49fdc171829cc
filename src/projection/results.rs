//! Output structures for property and portfolio projections

use super::equity::loan_to_value;
use crate::errors::Result;
use crate::money::{round_currency, saturating_sum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One property (or an aggregate of properties) in one projected year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionYearRecord {
    pub year: i32,

    // Balance sheet
    pub property_value: Decimal,
    pub total_debt: Decimal,
    pub equity: Decimal,
    pub lvr: Decimal,

    // Cashflow
    pub rental_income: Decimal,
    pub expenses: Decimal,
    pub loan_repayments: Decimal,
    pub depreciation: Decimal,
    pub net_cashflow: Decimal,
}

impl ProjectionYearRecord {
    /// Zeroed record for `year`
    pub fn empty(year: i32) -> Self {
        let zero = round_currency(Decimal::ZERO);
        Self {
            year,
            property_value: zero,
            total_debt: zero,
            equity: zero,
            lvr: zero,
            rental_income: zero,
            expenses: zero,
            loan_repayments: zero,
            depreciation: zero,
            net_cashflow: zero,
        }
    }

    /// Sum records for the same year.
    ///
    /// LVR is recomputed from the summed value and debt rather than averaged.
    /// Totals pin at the decimal range limit.
    pub fn aggregate<'a, I>(year: i32, records: I) -> Self
    where
        I: IntoIterator<Item = &'a ProjectionYearRecord>,
    {
        let mut total = Self::empty(year);
        for record in records {
            total.property_value = total.property_value.saturating_add(record.property_value);
            total.total_debt = total.total_debt.saturating_add(record.total_debt);
            total.equity = total.equity.saturating_add(record.equity);
            total.rental_income = total.rental_income.saturating_add(record.rental_income);
            total.expenses = total.expenses.saturating_add(record.expenses);
            total.loan_repayments = total.loan_repayments.saturating_add(record.loan_repayments);
            total.depreciation = total.depreciation.saturating_add(record.depreciation);
            total.net_cashflow = total.net_cashflow.saturating_add(record.net_cashflow);
        }
        total.lvr = loan_to_value(total.total_debt, total.property_value);
        total
    }
}

/// Portfolio-wide figures for a single year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub year: i32,
    pub total_value: Decimal,
    pub total_debt: Decimal,
    pub total_equity: Decimal,
    pub portfolio_lvr: Decimal,
    pub total_rental_income: Decimal,
    pub total_expenses: Decimal,
    pub total_loan_repayments: Decimal,
    pub total_net_cashflow: Decimal,
}

impl From<&ProjectionYearRecord> for PortfolioTotals {
    fn from(record: &ProjectionYearRecord) -> Self {
        Self {
            year: record.year,
            total_value: record.property_value,
            total_debt: record.total_debt,
            total_equity: record.equity,
            portfolio_lvr: record.lvr,
            total_rental_income: record.rental_income,
            total_expenses: record.expenses,
            total_loan_repayments: record.loan_repayments,
            total_net_cashflow: record.net_cashflow,
        }
    }
}

/// Year-by-year projection of a single property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyProjection {
    pub property_id: String,
    pub address: String,
    pub start_year: i32,
    pub end_year: i32,
    pub projections: Vec<ProjectionYearRecord>,
}

impl PropertyProjection {
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary::from_records(&self.projections)
    }
}

/// Per-property projections plus the portfolio totals for each year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioProjection {
    pub portfolio_id: String,
    pub portfolio_name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub properties: Vec<PropertyProjection>,
    pub totals: Vec<ProjectionYearRecord>,
}

impl PortfolioProjection {
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary::from_records(&self.totals)
    }

    /// Totals for the last projected year
    pub fn final_totals(&self) -> Option<&ProjectionYearRecord> {
        self.totals.last()
    }
}

/// Headline figures across a projection window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub opening_value: Decimal,
    pub final_value: Decimal,
    pub final_debt: Decimal,
    pub final_equity: Decimal,
    pub final_lvr: Decimal,
    pub equity_growth: Decimal,
    pub total_rental_income: Decimal,
    pub total_net_cashflow: Decimal,
}

impl ProjectionSummary {
    pub fn from_records(records: &[ProjectionYearRecord]) -> Self {
        let zero = round_currency(Decimal::ZERO);
        let first = records.first();
        let last = records.last();

        let total_rental_income = saturating_sum(records.iter().map(|r| r.rental_income));
        let total_net_cashflow = saturating_sum(records.iter().map(|r| r.net_cashflow));

        let opening_equity = first.map(|r| r.equity).unwrap_or(zero);
        let final_equity = last.map(|r| r.equity).unwrap_or(zero);

        Self {
            years: records.len() as u32,
            opening_value: first.map(|r| r.property_value).unwrap_or(zero),
            final_value: last.map(|r| r.property_value).unwrap_or(zero),
            final_debt: last.map(|r| r.total_debt).unwrap_or(zero),
            final_equity,
            final_lvr: last.map(|r| r.lvr).unwrap_or(zero),
            equity_growth: round_currency(final_equity.saturating_sub(opening_equity)),
            total_rental_income: round_currency(total_rental_income),
            total_net_cashflow: round_currency(total_net_cashflow),
        }
    }
}

/// Write a yearly series as CSV with a header row
pub fn write_projection_csv<W: Write>(records: &[ProjectionYearRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
