//! Input records supplied by the persistence layer for one projection call

use crate::assumptions::{
    DEFAULT_EXPENSE_GROWTH, DEFAULT_GROWTH_RATE, DEFAULT_LOAN_RATE, DEFAULT_RENTAL_GROWTH,
    DEFAULT_TERM_YEARS, DEFAULT_VACANCY_WEEKS,
};
use crate::money::{lenient, Frequency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

fn default_loan_rate() -> Decimal {
    DEFAULT_LOAN_RATE
}

fn default_term_years() -> i32 {
    DEFAULT_TERM_YEARS
}

fn default_growth_rate() -> Decimal {
    DEFAULT_GROWTH_RATE
}

fn default_rental_growth() -> Decimal {
    DEFAULT_RENTAL_GROWTH
}

fn default_expense_growth() -> Decimal {
    DEFAULT_EXPENSE_GROWTH
}

fn default_vacancy_weeks() -> Decimal {
    DEFAULT_VACANCY_WEEKS
}

fn weekly() -> Frequency {
    Frequency::Weekly
}

/// Repayment structure of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoanStructure {
    /// Only interest is paid; the principal never reduces
    InterestOnly,
    /// Standard amortizing loan
    #[default]
    PrincipalAndInterest,
}

impl LoanStructure {
    /// Anything other than an interest-only label is treated as P&I
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace(['-', '_', ' ', '&'], "").as_str() {
            "interestonly" | "io" => LoanStructure::InterestOnly,
            _ => LoanStructure::PrincipalAndInterest,
        }
    }
}

fn lenient_structure<'de, D>(deserializer: D) -> Result<LoanStructure, D::Error>
where
    D: Deserializer<'de>,
{
    lenient::parse_label(deserializer, LoanStructure::parse_lenient)
}

/// Property snapshot as stored, including the optional flat assumptions
/// used when no detailed records exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub id: String,

    #[serde(default)]
    pub address: String,

    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub current_value: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub purchase_price: Decimal,

    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,

    /// Flat capital growth (%) used when the property has no growth periods
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub capital_growth_rate: Option<Decimal>,

    /// Flat weekly rent used when no rental income records produce income
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub weekly_rent: Option<Decimal>,

    /// Growth (%) applied to `weekly_rent`
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub rental_growth_rate: Option<Decimal>,

    /// Flat annual expenses by category, used when no expense records produce expenses
    #[serde(default, deserialize_with = "lenient::decimal_map")]
    pub expense_items: BTreeMap<String, Decimal>,
}

impl PropertySnapshot {
    pub fn new(id: impl Into<String>, address: impl Into<String>, purchase_price: Decimal) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            purchase_price,
            ..Default::default()
        }
    }

    /// Current value if one is recorded and non-zero, otherwise the purchase price
    pub fn base_value(&self) -> Decimal {
        match self.current_value {
            Some(value) if !value.is_zero() => value,
            _ => self.purchase_price,
        }
    }
}

/// A loan secured against a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(default)]
    pub lender_name: String,

    #[serde(default, deserialize_with = "lenient::principal")]
    pub original_amount: Decimal,

    /// Falls back to `original_amount` when absent
    #[serde(default, deserialize_with = "lenient::optional_principal")]
    pub current_amount: Option<Decimal>,

    /// Annual rate as a percentage (6.25 for 6.25%)
    #[serde(default = "default_loan_rate", deserialize_with = "lenient::decimal")]
    pub interest_rate: Decimal,

    #[serde(default, alias = "loan_structure", deserialize_with = "lenient_structure")]
    pub structure: LoanStructure,

    #[serde(default = "default_term_years", deserialize_with = "lenient::int")]
    pub remaining_term_years: i32,

    #[serde(default, deserialize_with = "lenient::frequency")]
    pub repayment_frequency: Frequency,

    #[serde(default, deserialize_with = "lenient::principal")]
    pub offset_balance: Decimal,
}

impl LoanRecord {
    pub fn new(
        amount: Decimal,
        interest_rate: Decimal,
        structure: LoanStructure,
        remaining_term_years: i32,
    ) -> Self {
        Self {
            lender_name: String::new(),
            original_amount: amount,
            current_amount: Some(amount),
            interest_rate,
            structure,
            remaining_term_years,
            repayment_frequency: Frequency::Monthly,
            offset_balance: Decimal::ZERO,
        }
    }

    pub fn with_offset(mut self, offset_balance: Decimal) -> Self {
        self.offset_balance = offset_balance;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.repayment_frequency = frequency;
        self
    }

    pub fn with_current_amount(mut self, current_amount: Decimal) -> Self {
        self.current_amount = Some(current_amount);
        self
    }

    /// Outstanding balance, defaulting to the original amount
    pub fn balance(&self) -> Decimal {
        self.current_amount.unwrap_or(self.original_amount)
    }

    /// Balance after netting the offset account. Not clamped.
    pub fn net_principal(&self) -> Decimal {
        self.balance().saturating_sub(self.offset_balance)
    }
}

/// Annual capital growth rate for an inclusive span of years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRatePeriod {
    #[serde(default, deserialize_with = "lenient::int")]
    pub start_year: i32,

    /// `None` means open-ended
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub end_year: Option<i32>,

    /// Percentage per year
    #[serde(
        default = "default_growth_rate",
        alias = "growth_rate",
        deserialize_with = "lenient::decimal"
    )]
    pub rate: Decimal,
}

impl GrowthRatePeriod {
    pub fn new(start_year: i32, end_year: Option<i32>, rate: Decimal) -> Self {
        Self { start_year, end_year, rate }
    }

    /// Whether `year` falls inside this period (both ends inclusive)
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start_year && self.end_year.map_or(true, |end| year <= end)
    }
}

/// A point-in-time valuation of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    #[serde(alias = "valuation_date")]
    pub date: NaiveDate,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
}

impl Valuation {
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// Recurring rental income for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalIncomeRecord {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,

    #[serde(default = "weekly", deserialize_with = "lenient::frequency")]
    pub frequency: Frequency,

    #[serde(default = "default_rental_growth", deserialize_with = "lenient::decimal")]
    pub growth_rate: Decimal,

    #[serde(default = "default_vacancy_weeks", deserialize_with = "lenient::decimal")]
    pub vacancy_weeks_per_year: Decimal,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl RentalIncomeRecord {
    pub fn new(amount: Decimal, frequency: Frequency, growth_rate: Decimal, vacancy_weeks: Decimal) -> Self {
        Self {
            amount,
            frequency,
            growth_rate,
            vacancy_weeks_per_year: vacancy_weeks,
            start_date: None,
            end_date: None,
        }
    }
}

/// Recurring operating expense for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// council_rates, water, insurance, ...
    #[serde(default)]
    pub category: String,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "lenient::frequency")]
    pub frequency: Frequency,

    #[serde(default = "default_expense_growth", deserialize_with = "lenient::decimal")]
    pub growth_rate: Decimal,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ExpenseRecord {
    pub fn new(category: impl Into<String>, amount: Decimal, frequency: Frequency, growth_rate: Decimal) -> Self {
        Self {
            category: category.into(),
            amount,
            frequency,
            growth_rate,
            start_date: None,
            end_date: None,
        }
    }
}

/// Tax depreciation claimable for one year. Reported only; never a cash item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationEntry {
    #[serde(deserialize_with = "lenient::int")]
    pub year: i32,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub building_depreciation: Decimal,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub plant_and_equipment: Decimal,
}

impl DepreciationEntry {
    pub fn total(&self) -> Decimal {
        self.building_depreciation.saturating_add(self.plant_and_equipment)
    }
}

/// One property together with every record attached to it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyData {
    pub property: PropertySnapshot,

    #[serde(default)]
    pub loans: Vec<LoanRecord>,

    #[serde(default)]
    pub growth_rates: Vec<GrowthRatePeriod>,

    #[serde(default)]
    pub valuations: Vec<Valuation>,

    #[serde(default)]
    pub rental_incomes: Vec<RentalIncomeRecord>,

    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,

    #[serde(default)]
    pub depreciation: Vec<DepreciationEntry>,
}

impl PropertyData {
    pub fn new(property: PropertySnapshot) -> Self {
        Self {
            property,
            ..Default::default()
        }
    }

    /// Depreciation claimable in `year`, from the first matching entry
    pub fn depreciation_for_year(&self, year: i32) -> Decimal {
        self.depreciation
            .iter()
            .find(|entry| entry.year == year)
            .map(DepreciationEntry::total)
            .unwrap_or(Decimal::ZERO)
    }
}

/// A named collection of properties projected together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub properties: Vec<PropertyData>,
}

impl Portfolio {
    pub fn find(&self, property_id: &str) -> Option<&PropertyData> {
        self.properties.iter().find(|p| p.property.id == property_id)
    }
}
