//! Projection engine for single properties and whole portfolios

mod cashflow;
mod engine;
mod equity;
mod growth;
mod income;
mod results;
mod valuation;

pub use cashflow::{annual_loan_repayments, calculate_property_cashflow, CashflowPosition};
pub use engine::{
    calculate_portfolio_summary, current_status, find_property, generate_portfolio_projections, project_year,
    ProjectionConfig, ProjectionEngine, ProjectionWindow, PropertyStatus,
};
pub use equity::{calculate_property_equity, loan_to_value, total_debt_for_year, EquityPosition};
pub use growth::{get_growth_rate_for_year, growth_rate_for_year};
pub use income::{calculate_expenses_for_year, calculate_rental_income_for_year};
pub use results::{
    write_projection_csv, PortfolioProjection, PortfolioTotals, ProjectionSummary, ProjectionYearRecord,
    PropertyProjection,
};
pub use valuation::{calculate_property_value, latest_valuation};
