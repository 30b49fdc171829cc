//! Default assumptions applied when stored records leave a field out
//!
//! These are compile-time constants; nothing here is mutable at runtime.
//! Scenario-level adjustments live in [`crate::scenario::ScenarioParams`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Annual capital growth (%) when a property has no growth periods at all
pub const DEFAULT_GROWTH_RATE: Decimal = dec!(5.0);

/// Loan interest rate (%) when a loan record omits it
pub const DEFAULT_LOAN_RATE: Decimal = dec!(6);

/// Remaining loan term (years) when a loan record omits it
pub const DEFAULT_TERM_YEARS: i32 = 30;

/// Annual rental growth (%) when a rental record omits it
pub const DEFAULT_RENTAL_GROWTH: Decimal = dec!(3);

/// Annual expense growth (%) when an expense record omits it
pub const DEFAULT_EXPENSE_GROWTH: Decimal = dec!(2.5);

/// Vacancy weeks per year when a rental record omits it
pub const DEFAULT_VACANCY_WEEKS: Decimal = dec!(2);

/// Largest projection window a caller may request, in years
pub const MAX_PROJECTION_YEARS: u32 = 50;

/// Projection window used when the caller does not ask for one
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

/// Longest loan term the amortization formulas will count periods for.
/// Longer stored terms are treated as this many years.
pub const MAX_TERM_YEARS: i32 = 1000;
