//! Scenario runner for batch and stress projections
//!
//! Loads a portfolio once, then runs it under many scenario settings
//! without re-reading the input file.

use crate::errors::Result;
use crate::projection::{PortfolioProjection, ProjectionConfig, ProjectionEngine, ProjectionYearRecord};
use crate::records::{load_portfolio, Portfolio};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scenario knobs threaded through every calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Percentage points added to every loan's rate
    #[serde(default)]
    pub interest_rate_offset: Decimal,

    /// Replaces every expense record's growth rate when set
    #[serde(default)]
    pub expense_growth_override: Option<Decimal>,
}

impl ScenarioParams {
    pub fn baseline() -> Self {
        Self::default()
    }

    pub fn rate_shock(points: Decimal) -> Self {
        Self {
            interest_rate_offset: points,
            expense_growth_override: None,
        }
    }

    pub fn with_expense_growth(mut self, rate: Decimal) -> Self {
        self.expense_growth_override = Some(rate);
        self
    }

    pub fn is_baseline(&self) -> bool {
        self.interest_rate_offset.is_zero() && self.expense_growth_override.is_none()
    }
}

/// A scenario with a display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub params: ScenarioParams,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, params: ScenarioParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Baseline plus +1, +2 and +3 point rate shocks
pub fn standard_stress_set() -> Vec<NamedScenario> {
    let mut scenarios = vec![NamedScenario::new("Baseline", ScenarioParams::baseline())];
    scenarios.extend([dec!(1), dec!(2), dec!(3)].into_iter().map(|points| {
        NamedScenario::new(format!("Rates +{}%", points), ScenarioParams::rate_shock(points))
    }));
    scenarios
}

/// Final-year position of a portfolio under one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub params: ScenarioParams,
    pub final_year: ProjectionYearRecord,
}

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_json_path(Path::new("data/sample_portfolio.json"))?;
/// for outcome in runner.stress_test(2025, 10) {
///     println!("{}: {}", outcome.name, outcome.final_year.net_cashflow);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    portfolio: Portfolio,
}

impl ScenarioRunner {
    pub fn new(portfolio: Portfolio) -> Self {
        Self { portfolio }
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        Ok(Self {
            portfolio: load_portfolio(path)?,
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Run a single projection with the given config
    pub fn run(&self, config: ProjectionConfig) -> PortfolioProjection {
        ProjectionEngine::new(config).project_portfolio(&self.portfolio)
    }

    /// Run several configs in parallel; results follow the order of `configs`
    pub fn run_batch(&self, configs: &[ProjectionConfig]) -> Vec<PortfolioProjection> {
        log::info!(
            "Running {} scenarios over {} properties",
            configs.len(),
            self.portfolio.properties.len()
        );
        configs.par_iter().map(|config| self.run(config.clone())).collect()
    }

    /// Run named scenarios over a shared window and keep each one's final-year totals
    pub fn run_scenarios(&self, start_year: i32, years: u32, scenarios: &[NamedScenario]) -> Vec<ScenarioOutcome> {
        let configs: Vec<ProjectionConfig> = scenarios
            .iter()
            .map(|s| ProjectionConfig::new(start_year, years).with_scenario(s.params))
            .collect();

        self.run_batch(&configs)
            .into_iter()
            .zip(scenarios)
            .map(|(projection, scenario)| ScenarioOutcome {
                name: scenario.name.clone(),
                params: scenario.params,
                final_year: projection
                    .final_totals()
                    .cloned()
                    .unwrap_or_else(|| ProjectionYearRecord::empty(projection.end_year)),
            })
            .collect()
    }

    /// Baseline and rate-shock scenarios from [`standard_stress_set`]
    pub fn stress_test(&self, start_year: i32, years: u32) -> Vec<ScenarioOutcome> {
        self.run_scenarios(start_year, years, &standard_stress_set())
    }
}
