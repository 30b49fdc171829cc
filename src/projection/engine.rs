//! Multi-year projection engine for single properties and whole portfolios

use super::cashflow::{calculate_property_cashflow, CashflowPosition};
use super::equity::{calculate_property_equity, EquityPosition};
use super::income::{calculate_expenses_for_year, calculate_rental_income_for_year, years_elapsed};
use super::results::{PortfolioProjection, PortfolioTotals, ProjectionYearRecord, PropertyProjection};
use super::valuation::calculate_property_value;
use crate::assumptions::{DEFAULT_RENTAL_GROWTH, MAX_PROJECTION_YEARS};
use crate::errors::{Error, Result};
use crate::money::{annualize, compound, saturating_sum, Frequency};
use crate::records::{GrowthRatePeriod, Portfolio, PropertyData};
use crate::scenario::ScenarioParams;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A validated run of years: `start_year` through `start_year + years` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionWindow {
    start_year: i32,
    years: u32,
}

impl ProjectionWindow {
    /// Rejects `years` outside `1..=50`
    pub fn new(start_year: i32, years: u32) -> Result<Self> {
        if years < 1 || years > MAX_PROJECTION_YEARS {
            return Err(Error::InvalidWindow {
                years,
                max: MAX_PROJECTION_YEARS,
            });
        }
        Ok(Self { start_year, years })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn end_year(&self) -> i32 {
        offset_year(self.start_year, self.years)
    }
}

/// `start_year + years`, pinned at `i32::MAX`
fn offset_year(start_year: i32, years: u32) -> i32 {
    start_year.saturating_add(i32::try_from(years).unwrap_or(i32::MAX))
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// First projected year; also the base year that growth and amortization count from
    pub start_year: i32,

    /// Years projected after the start year. The engine emits `years + 1` records.
    pub years: u32,

    /// Rate shock and expense growth override
    #[serde(default)]
    pub scenario: ScenarioParams,
}

impl ProjectionConfig {
    pub fn new(start_year: i32, years: u32) -> Self {
        Self {
            start_year,
            years,
            scenario: ScenarioParams::default(),
        }
    }

    /// Config for a validated window
    pub fn for_window(window: ProjectionWindow, scenario: ScenarioParams) -> Self {
        Self {
            start_year: window.start_year(),
            years: window.years(),
            scenario,
        }
    }

    pub fn with_scenario(mut self, scenario: ScenarioParams) -> Self {
        self.scenario = scenario;
        self
    }

    /// Last projected year, pinned at `i32::MAX`.
    ///
    /// Configs built with [`ProjectionConfig::new`] are not range checked;
    /// go through [`ProjectionWindow`] to reject oversized runs up front.
    pub fn end_year(&self) -> i32 {
        offset_year(self.start_year, self.years)
    }
}

/// Snapshot of a property in a single year, with no projection applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyStatus {
    pub property_id: String,
    pub address: String,
    pub year: i32,
    pub position: EquityPosition,
    pub cashflow: CashflowPosition,
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project one property into one year, counting from the configured start year
    pub fn project_property_year(&self, data: &PropertyData, year: i32) -> ProjectionYearRecord {
        project_year(data, year, self.config.start_year, &self.config.scenario)
    }

    /// Run the full window for one property
    pub fn project_property(&self, data: &PropertyData) -> PropertyProjection {
        let projections = (self.config.start_year..=self.config.end_year())
            .map(|year| self.project_property_year(data, year))
            .collect();

        PropertyProjection {
            property_id: data.property.id.clone(),
            address: data.property.address.clone(),
            start_year: self.config.start_year,
            end_year: self.config.end_year(),
            projections,
        }
    }

    /// Run the full window for every property in parallel, then total each year.
    /// Property order in the result matches the portfolio.
    pub fn project_portfolio(&self, portfolio: &Portfolio) -> PortfolioProjection {
        log::debug!(
            "Projecting portfolio '{}' ({} properties) {}..={}",
            portfolio.name,
            portfolio.properties.len(),
            self.config.start_year,
            self.config.end_year()
        );

        let properties: Vec<PropertyProjection> = portfolio
            .properties
            .par_iter()
            .map(|data| self.project_property(data))
            .collect();

        let totals = (self.config.start_year..=self.config.end_year())
            .enumerate()
            .map(|(index, year)| {
                ProjectionYearRecord::aggregate(year, properties.iter().map(|p| &p.projections[index]))
            })
            .collect();

        PortfolioProjection {
            portfolio_id: portfolio.id.clone(),
            portfolio_name: portfolio.name.clone(),
            start_year: self.config.start_year,
            end_year: self.config.end_year(),
            properties,
            totals,
        }
    }
}

/// Project one property into `target_year`, counting growth and amortization from `base_year`.
///
/// Property-level fallbacks apply when the record lists are empty: a flat
/// `capital_growth_rate` becomes an open-ended period from `base_year`, a
/// `weekly_rent` stands in for missing rental income, and `expense_items`
/// stand in for missing expenses.
pub fn project_year(
    data: &PropertyData,
    target_year: i32,
    base_year: i32,
    scenario: &ScenarioParams,
) -> ProjectionYearRecord {
    let growth_periods = growth_periods_for(data, base_year);
    let projected_value = calculate_property_value(
        data.property.base_value(),
        base_year,
        target_year,
        &growth_periods,
        &data.valuations,
    );

    let position = calculate_property_equity(
        projected_value,
        &data.loans,
        target_year,
        base_year,
        scenario.interest_rate_offset,
    );

    let rental_income = rental_income_for(data, target_year, base_year);
    let expenses = expenses_for(data, target_year, base_year, scenario.expense_growth_override);
    let depreciation = data.depreciation_for_year(target_year);

    let cashflow = calculate_property_cashflow(
        &data.loans,
        rental_income,
        expenses,
        depreciation,
        scenario.interest_rate_offset,
    );

    log::debug!(
        "{} {}: value={} debt={} net={}",
        data.property.id,
        target_year,
        position.property_value,
        position.total_debt,
        cashflow.net_cashflow
    );

    ProjectionYearRecord {
        year: target_year,
        property_value: position.property_value,
        total_debt: position.total_debt,
        equity: position.equity,
        lvr: position.lvr,
        rental_income: cashflow.rental_income,
        expenses: cashflow.expenses,
        loan_repayments: cashflow.loan_repayments,
        depreciation: cashflow.depreciation,
        net_cashflow: cashflow.net_cashflow,
    }
}

fn growth_periods_for(data: &PropertyData, base_year: i32) -> Cow<'_, [GrowthRatePeriod]> {
    match data.property.capital_growth_rate {
        Some(rate) if data.growth_rates.is_empty() => {
            Cow::Owned(vec![GrowthRatePeriod::new(base_year, None, rate)])
        }
        _ => Cow::Borrowed(&data.growth_rates),
    }
}

fn rental_income_for(data: &PropertyData, target_year: i32, base_year: i32) -> Decimal {
    let rental = calculate_rental_income_for_year(&data.rental_incomes, target_year, base_year);
    match data.property.weekly_rent {
        Some(weekly_rent) if rental.is_zero() => {
            let growth = data.property.rental_growth_rate.unwrap_or(DEFAULT_RENTAL_GROWTH);
            compound(annualize(weekly_rent, Frequency::Weekly), growth, years_elapsed(target_year, base_year))
        }
        _ => rental,
    }
}

fn expenses_for(data: &PropertyData, target_year: i32, base_year: i32, growth_override: Option<Decimal>) -> Decimal {
    let expenses = calculate_expenses_for_year(&data.expenses, target_year, base_year, growth_override);
    if expenses.is_zero() && !data.property.expense_items.is_empty() {
        return saturating_sum(data.property.expense_items.values().copied());
    }
    expenses
}

/// Portfolio totals for a single year across `properties`
pub fn calculate_portfolio_summary(
    properties: &[PropertyData],
    target_year: i32,
    base_year: i32,
    scenario: &ScenarioParams,
) -> PortfolioTotals {
    let records: Vec<ProjectionYearRecord> = properties
        .iter()
        .map(|data| project_year(data, target_year, base_year, scenario))
        .collect();
    PortfolioTotals::from(&ProjectionYearRecord::aggregate(target_year, &records))
}

/// Portfolio totals for every year in `start_year..=end_year`, with `start_year` as the base
pub fn generate_portfolio_projections(
    properties: &[PropertyData],
    start_year: i32,
    end_year: i32,
    scenario: &ScenarioParams,
) -> Vec<PortfolioTotals> {
    (start_year..=end_year)
        .map(|year| calculate_portfolio_summary(properties, year, start_year, scenario))
        .collect()
}

/// Current position of a property in `year`.
///
/// Uses the stored base value with no valuation or growth applied, and
/// neither a rate offset nor an expense override.
pub fn current_status(data: &PropertyData, year: i32) -> PropertyStatus {
    let position = calculate_property_equity(data.property.base_value(), &data.loans, year, year, Decimal::ZERO);
    let rental_income = calculate_rental_income_for_year(&data.rental_incomes, year, year);
    let expenses = calculate_expenses_for_year(&data.expenses, year, year, None);
    let cashflow = calculate_property_cashflow(&data.loans, rental_income, expenses, Decimal::ZERO, Decimal::ZERO);

    PropertyStatus {
        property_id: data.property.id.clone(),
        address: data.property.address.clone(),
        year,
        position,
        cashflow,
    }
}

/// Look up a property by id, failing with [`Error::PropertyNotFound`]
pub fn find_property<'a>(portfolio: &'a Portfolio, property_id: &str) -> Result<&'a PropertyData> {
    portfolio
        .find(property_id)
        .ok_or_else(|| Error::PropertyNotFound(property_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::round_currency;
    use crate::records::{
        DepreciationEntry, ExpenseRecord, LoanRecord, LoanStructure, PropertySnapshot, RentalIncomeRecord,
    };
    use rust_decimal_macros::dec;

    fn investment_property() -> PropertyData {
        let mut data = PropertyData::new(PropertySnapshot::new("p1", "1 Example St", dec!(800000)));
        data.growth_rates = vec![GrowthRatePeriod::new(2024, None, dec!(5.0))];
        data.loans = vec![LoanRecord::new(dec!(600000), dec!(6.0), LoanStructure::InterestOnly, 30)];
        data.rental_incomes = vec![RentalIncomeRecord::new(dec!(700), Frequency::Weekly, Decimal::ZERO, Decimal::ZERO)];
        data.expenses = vec![ExpenseRecord::new("council_rates", dec!(2400), Frequency::Annually, Decimal::ZERO)];
        data.depreciation = vec![DepreciationEntry {
            year: 2025,
            building_depreciation: dec!(6000),
            plant_and_equipment: dec!(1500),
        }];
        data
    }

    fn portfolio(properties: Vec<PropertyData>) -> Portfolio {
        Portfolio {
            id: "pf".into(),
            name: "Test".into(),
            properties,
        }
    }

    #[test]
    fn test_window_bounds() {
        assert!(ProjectionWindow::new(2024, 0).is_err());
        assert!(ProjectionWindow::new(2024, 51).is_err());
        let window = ProjectionWindow::new(2024, 50).unwrap();
        assert_eq!(window.end_year(), 2074);
        assert!(matches!(
            ProjectionWindow::new(2024, 0),
            Err(Error::InvalidWindow { years: 0, max: 50 })
        ));
    }

    #[test]
    fn test_project_property_window() {
        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 10));
        let projection = engine.project_property(&investment_property());

        assert_eq!(projection.start_year, 2024);
        assert_eq!(projection.end_year, 2034);
        assert_eq!(projection.projections.len(), 11);
        assert_eq!(projection.projections[0].year, 2024);
        assert!(projection.projections.windows(2).all(|w| w[1].year == w[0].year + 1));

        let first = &projection.projections[0];
        assert_eq!(first.property_value, dec!(800000.00));
        assert_eq!(first.total_debt, dec!(600000.00));
        assert_eq!(first.lvr, dec!(75.00));
        assert_eq!(first.rental_income, dec!(36400.00));
        assert_eq!(first.loan_repayments, dec!(36000.00));
        assert_eq!(first.net_cashflow, dec!(-2000.00));

        let last = &projection.projections[10];
        assert_eq!(last.property_value, dec!(1303115.70));
    }

    #[test]
    fn test_depreciation_reported_for_matching_year() {
        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 2));
        let projection = engine.project_property(&investment_property());
        assert_eq!(projection.projections[0].depreciation, Decimal::ZERO);
        assert_eq!(projection.projections[1].depreciation, dec!(7500.00));
        assert_eq!(projection.projections[1].net_cashflow, projection.projections[0].net_cashflow);
    }

    #[test]
    fn test_rate_offset_scenario() {
        let config = ProjectionConfig::new(2024, 1).with_scenario(ScenarioParams::rate_shock(dec!(2.0)));
        let engine = ProjectionEngine::new(config);
        let record = engine.project_property_year(&investment_property(), 2024);
        assert_eq!(record.loan_repayments, dec!(48000.00));
        assert_eq!(record.net_cashflow, dec!(-14000.00));
    }

    #[test]
    fn test_growth_rate_fallback() {
        let mut property = PropertySnapshot::new("p2", "2 Example St", dec!(500000));
        property.capital_growth_rate = Some(dec!(10.0));
        let data = PropertyData::new(property);

        let engine = ProjectionEngine::new(ProjectionConfig::new(2030, 2));
        let projection = engine.project_property(&data);
        assert_eq!(projection.projections[2].property_value, dec!(605000.00));
    }

    #[test]
    fn test_weekly_rent_fallback() {
        let mut property = PropertySnapshot::new("p3", "3 Example St", dec!(500000));
        property.weekly_rent = Some(dec!(500));
        property.rental_growth_rate = Some(dec!(10));
        let data = PropertyData::new(property);

        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 1));
        let projection = engine.project_property(&data);
        // No vacancy discount on the fallback
        assert_eq!(projection.projections[0].rental_income, dec!(26000.00));
        assert_eq!(projection.projections[1].rental_income, dec!(28600.00));
    }

    #[test]
    fn test_expense_items_fallback() {
        let mut property = PropertySnapshot::new("p4", "4 Example St", dec!(500000));
        property.expense_items.insert("insurance".into(), dec!(1800));
        property.expense_items.insert("council_rates".into(), dec!(2200));
        let data = PropertyData::new(property);

        let record = ProjectionEngine::new(ProjectionConfig::new(2024, 1)).project_property_year(&data, 2025);
        assert_eq!(record.expenses, dec!(4000.00));
        assert_eq!(record.net_cashflow, dec!(-4000.00));
    }

    #[test]
    fn test_portfolio_totals_match_properties() {
        let mut second = investment_property();
        second.property.id = "p2".into();
        second.loans.clear();

        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 5));
        let result = engine.project_portfolio(&portfolio(vec![investment_property(), second]));

        assert_eq!(result.properties.len(), 2);
        assert_eq!(result.properties[0].property_id, "p1");
        assert_eq!(result.properties[1].property_id, "p2");
        assert_eq!(result.totals.len(), 6);

        let first = &result.totals[0];
        assert_eq!(first.property_value, dec!(1600000.00));
        assert_eq!(first.total_debt, dec!(600000.00));
        assert_eq!(first.lvr, dec!(37.50));
    }

    #[test]
    fn test_empty_portfolio_has_zero_totals() {
        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 3));
        let result = engine.project_portfolio(&portfolio(Vec::new()));
        assert!(result.properties.is_empty());
        assert_eq!(result.totals.len(), 4);
        assert!(result.totals.iter().all(|t| t.property_value.is_zero() && t.lvr.is_zero()));
    }

    #[test]
    fn test_generate_portfolio_projections() {
        let properties = vec![investment_property()];
        let years = generate_portfolio_projections(&properties, 2024, 2034, &ScenarioParams::default());
        assert_eq!(years.len(), 11);
        assert_eq!(years[0].year, 2024);
        assert!(years.windows(2).all(|w| w[0].year < w[1].year));
        assert_eq!(years[10].total_value, dec!(1303115.70));
    }

    #[test]
    fn test_portfolio_summary_agrees_with_engine() {
        let properties = vec![investment_property()];
        let scenario = ScenarioParams::default();
        let summary = calculate_portfolio_summary(&properties, 2027, 2024, &scenario);

        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 5));
        let result = engine.project_portfolio(&portfolio(properties));
        assert_eq!(summary, PortfolioTotals::from(&result.totals[3]));
    }

    #[test]
    fn test_current_status() {
        let mut data = investment_property();
        data.property.current_value = Some(dec!(900000));
        let status = current_status(&data, 2026);

        assert_eq!(status.position.property_value, dec!(900000.00));
        assert_eq!(status.position.lvr, dec!(66.67));
        assert_eq!(status.cashflow.rental_income, dec!(36400.00));
        assert_eq!(status.cashflow.depreciation, Decimal::ZERO);
        assert_eq!(status.cashflow.net_cashflow, dec!(-2000.00));
    }

    #[test]
    fn test_find_property() {
        let pf = portfolio(vec![investment_property()]);
        assert!(find_property(&pf, "p1").is_ok());
        assert!(matches!(find_property(&pf, "nope"), Err(Error::PropertyNotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_expense_growth_override_reaches_projection() {
        let baseline = ProjectionEngine::new(ProjectionConfig::new(2024, 2)).project_property(&investment_property());
        let config = ProjectionConfig::new(2024, 2)
            .with_scenario(ScenarioParams::baseline().with_expense_growth(dec!(10)));
        let inflated = ProjectionEngine::new(config).project_property(&investment_property());

        assert_eq!(baseline.projections[2].expenses, dec!(2400.00));
        assert_eq!(inflated.projections[0].expenses, dec!(2400.00));
        assert_eq!(inflated.projections[2].expenses, dec!(2904.00));
        assert_eq!(
            inflated.projections[2].net_cashflow,
            baseline.projections[2].net_cashflow - dec!(504.00)
        );
    }

    #[test]
    fn test_runaway_growth_portfolio_saturates() {
        let mut first = investment_property();
        first.growth_rates = vec![GrowthRatePeriod::new(2024, None, dec!(100000))];
        let mut second = first.clone();
        second.property.id = "p2".into();

        let engine = ProjectionEngine::new(ProjectionConfig::new(2024, 10));
        let result = engine.project_portfolio(&portfolio(vec![first, second]));

        let last = result.final_totals().unwrap();
        assert_eq!(last.year, 2034);
        assert_eq!(last.property_value, round_currency(Decimal::MAX));
        assert_eq!(last.equity, round_currency(Decimal::MAX));
        assert_eq!(last.lvr, Decimal::ZERO);
        assert!(result.summary().equity_growth > Decimal::ZERO);
    }

    #[test]
    fn test_end_year_pins_at_year_limit() {
        assert_eq!(ProjectionConfig::new(2024, 10).end_year(), 2034);
        assert_eq!(ProjectionConfig::new(i32::MAX - 1, 5).end_year(), i32::MAX);
        assert_eq!(ProjectionConfig::new(2024, u32::MAX).end_year(), i32::MAX);
        assert_eq!(ProjectionConfig::new(i32::MIN, u32::MAX).end_year(), i32::MIN + i32::MAX);
    }
}
