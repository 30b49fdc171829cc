//! Property Projection - decimal-precise financial projection engine for property portfolios
//!
//! This library provides:
//! - Loan repayment, remaining-balance and amortization schedule calculations
//! - Year-by-year projection of property value, debt, equity and LVR
//! - Rental income, expense and net cashflow projection
//! - Portfolio aggregation and rate-shock stress scenarios
//!
//! All monetary quantities are `rust_decimal::Decimal`, rounded half-up to
//! cents at each public boundary.

pub mod assumptions;
pub mod errors;
pub mod loan;
pub mod money;
pub mod projection;
pub mod records;
pub mod scenario;

// Re-export commonly used types
pub use errors::{Error, Result};
pub use money::Frequency;
pub use projection::{
    PortfolioProjection, ProjectionConfig, ProjectionEngine, ProjectionWindow, ProjectionYearRecord,
    PropertyProjection,
};
pub use records::{LoanRecord, LoanStructure, Portfolio, PropertyData};
pub use scenario::{ScenarioParams, ScenarioRunner};
