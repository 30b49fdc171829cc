//! Recurrence frequencies and their annualization multipliers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a recurring amount (rent, expense, repayment) occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Fortnightly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
    /// Counted once per year, same as `Annually`
    OneTime,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annually,
        Frequency::OneTime,
    ];

    /// Number of occurrences per year
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Weekly => 52,
            Frequency::Fortnightly => 26,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annually => 1,
            Frequency::OneTime => 1,
        }
    }

    /// Annualization multiplier as a decimal
    pub fn multiplier(self) -> Decimal {
        Decimal::from(self.periods_per_year())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Fortnightly => "Fortnightly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Annually => "Annually",
            Frequency::OneTime => "OneTime",
        }
    }

    /// Parse a stored frequency label, falling back to `Monthly` for
    /// anything unrecognised (multiplier 12).
    pub fn parse_lenient(label: &str) -> Self {
        match label.parse() {
            Ok(frequency) => frequency,
            Err(_) => {
                log::warn!("Unknown frequency '{}', treating as Monthly", label);
                Frequency::Monthly
            }
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "fortnightly" => Ok(Frequency::Fortnightly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annually" | "annual" | "yearly" => Ok(Frequency::Annually),
            "onetime" | "once" => Ok(Frequency::OneTime),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}
