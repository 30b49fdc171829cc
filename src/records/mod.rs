//! Input data contracts and portfolio loading

mod data;
pub mod loader;

pub use data::{
    DepreciationEntry, ExpenseRecord, GrowthRatePeriod, LoanRecord, LoanStructure, Portfolio,
    PropertyData, PropertySnapshot, RentalIncomeRecord, Valuation,
};
pub use loader::{load_default_portfolio, load_portfolio, load_portfolio_from_reader, DEFAULT_PORTFOLIO_PATH};
