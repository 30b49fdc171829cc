//! Lenient serde deserializers for persisted input records
//!
//! Stored records come from heterogeneous sources, so numeric fields may
//! arrive as integers, floats, numeric strings or null. A field that is
//! missing entirely takes its `#[serde(default = ...)]`; a field that is
//! present but null or unparsable coerces to zero instead of failing the
//! whole record. Labels such as a frequency fall back to their default when
//! they are not text.

use super::{round_principal, DecimalSource, Frequency};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl DecimalSource for RawNumber {
    fn try_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Integer(v) => v.try_decimal(),
            RawNumber::Float(v) => v.try_decimal(),
            RawNumber::Text(v) => v.try_decimal(),
            RawNumber::Other(_) => None,
        }
    }
}

impl RawNumber {
    fn try_year(&self) -> Option<i32> {
        match self {
            RawNumber::Integer(v) => i32::try_from(*v).ok(),
            RawNumber::Float(v) if v.is_finite() => Some(v.trunc() as i32),
            RawNumber::Text(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

fn coerce(raw: Option<RawNumber>) -> Option<Decimal> {
    let value = raw.as_ref().and_then(|r| r.try_decimal());
    if let (Some(r), None) = (&raw, value) {
        log::warn!("Unparsable numeric input {:?}, coercing to zero", r);
    }
    value
}

/// Decimal field; null or unparsable becomes zero
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(coerce(raw).unwrap_or(Decimal::ZERO))
}

/// Optional decimal field; null or unparsable becomes `None`
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(coerce(raw))
}

/// Loan principal field, held at 4 dp
pub fn principal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    decimal(deserializer).map(round_principal)
}

/// Optional loan principal field, held at 4 dp
pub fn optional_principal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_decimal(deserializer).map(|v| v.map(round_principal))
}

/// Whole-number field such as a year or term; null or unparsable becomes zero
pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    optional_int(deserializer).map(|v| v.unwrap_or(0))
}

/// Nullable whole-number field such as an open-ended `end_year`
pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.try_year()))
}

/// Named amounts such as flat expense items; null or unparsable entries become zero
pub fn decimal_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawItems {
        Items(BTreeMap<String, Option<RawNumber>>),
        Other(IgnoredAny),
    }

    let items = match Option::<RawItems>::deserialize(deserializer)? {
        Some(RawItems::Items(items)) => items,
        Some(RawItems::Other(_)) => {
            log::warn!("Expected a map of amounts, ignoring");
            BTreeMap::new()
        }
        None => BTreeMap::new(),
    };

    Ok(items
        .into_iter()
        .map(|(name, raw)| (name, coerce(raw).unwrap_or(Decimal::ZERO)))
        .collect())
}

/// Text label parsed with `parse`; null or non-text values take `T::default()`
pub fn parse_label<'de, D, T, F>(deserializer: D, parse: F) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default,
    F: FnOnce(&str) -> T,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Text(label)) => Ok(parse(&label)),
        Some(other) => {
            log::warn!("Non-text label {:?}, using the default", other);
            Ok(T::default())
        }
        None => Ok(T::default()),
    }
}

/// Frequency label; unknown or non-text labels fall back to `Monthly`
pub fn frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    parse_label(deserializer, Frequency::parse_lenient)
}
