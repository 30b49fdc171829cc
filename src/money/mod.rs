//! Fixed-point money helpers: coercion, rounding, annualization and compounding
//!
//! Every currency figure in the engine is a `rust_decimal::Decimal`. Values are
//! only quantized at the public boundaries (2 dp for currency and LVR, 4 dp
//! for loan principals) using round-half-up.

mod frequency;
pub mod lenient;

pub use frequency::Frequency;

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Decimal places for currency figures
pub const CURRENCY_SCALE: u32 = 2;

/// Decimal places for loan principals
pub const PRINCIPAL_SCALE: u32 = 4;

/// Decimal places for loan-to-value ratios
pub const LVR_SCALE: u32 = 2;

/// Weeks in a year, used for vacancy adjustment
pub const WEEKS_PER_YEAR: Decimal = dec!(52);

/// Months in a year, used for monthly balance tracking
pub const MONTHS_PER_YEAR: u32 = 12;

/// Anything that can be coerced into a decimal amount.
///
/// Returns `None` when the source is missing or cannot be represented
/// (unparsable text, NaN, out of range).
pub trait DecimalSource {
    fn try_decimal(&self) -> Option<Decimal>;
}

impl DecimalSource for Decimal {
    fn try_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl DecimalSource for i32 {
    fn try_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl DecimalSource for i64 {
    fn try_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl DecimalSource for u32 {
    fn try_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl DecimalSource for u64 {
    fn try_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl DecimalSource for f64 {
    fn try_decimal(&self) -> Option<Decimal> {
        // Go through the shortest round-trip text form so 100.5 stays 100.5
        // instead of its binary expansion.
        if !self.is_finite() {
            return None;
        }
        parse_decimal_text(&self.to_string())
    }
}

impl DecimalSource for str {
    fn try_decimal(&self) -> Option<Decimal> {
        parse_decimal_text(self)
    }
}

impl DecimalSource for String {
    fn try_decimal(&self) -> Option<Decimal> {
        parse_decimal_text(self)
    }
}

impl<T: DecimalSource + ?Sized> DecimalSource for &T {
    fn try_decimal(&self) -> Option<Decimal> {
        (**self).try_decimal()
    }
}

impl<T: DecimalSource> DecimalSource for Option<T> {
    fn try_decimal(&self) -> Option<Decimal> {
        self.as_ref().and_then(|v| v.try_decimal())
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Coerce a value into a decimal, yielding zero when it is missing or unparsable
pub fn to_decimal<T: DecimalSource + ?Sized>(value: &T) -> Decimal {
    to_decimal_or(value, Decimal::ZERO)
}

/// Coerce a value into a decimal, yielding `default` when it is missing or unparsable
pub fn to_decimal_or<T: DecimalSource + ?Sized>(value: &T, default: Decimal) -> Decimal {
    value.try_decimal().unwrap_or(default)
}

/// Round half-up to `scale` places and pin the scale so the value always
/// renders with exactly that many fraction digits.
pub fn quantize(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Round to cents, half-up
pub fn round_currency(value: Decimal) -> Decimal {
    quantize(value, CURRENCY_SCALE)
}

/// Round a loan principal to 4 dp, half-up
pub fn round_principal(value: Decimal) -> Decimal {
    quantize(value, PRINCIPAL_SCALE)
}

/// Round a loan-to-value ratio to 2 dp, half-up
pub fn round_lvr(value: Decimal) -> Decimal {
    quantize(value, LVR_SCALE)
}

/// Convert an amount paid at `frequency` into its annual total
pub fn annualize(amount: Decimal, frequency: Frequency) -> Decimal {
    amount.saturating_mul(frequency.multiplier())
}

/// Percentage rate (6.25 for 6.25%) as a plain fraction (0.0625)
pub fn percent_to_fraction(rate: Decimal) -> Decimal {
    rate / Decimal::ONE_HUNDRED
}

/// Growth multiplier for one period at a percentage rate: `1 + rate/100`
pub fn growth_factor(rate: Decimal) -> Decimal {
    Decimal::ONE + percent_to_fraction(rate)
}

/// `base^periods`, or `None` if the result leaves the representable range
pub fn checked_power(base: Decimal, periods: u32) -> Option<Decimal> {
    base.checked_powu(u64::from(periods))
}

/// Compound `amount` at `rate` percent for `periods` periods.
///
/// Saturates at the decimal range limit instead of panicking when the
/// inputs are absurd (e.g. thousands of percent over decades).
pub fn compound(amount: Decimal, rate: Decimal, periods: u32) -> Decimal {
    match checked_power(growth_factor(rate), periods).and_then(|f| amount.checked_mul(f)) {
        Some(value) => value,
        None => {
            log::warn!(
                "Compounding {} at {}% for {} periods overflowed; saturating",
                amount, rate, periods
            );
            saturate(amount)
        }
    }
}

/// Sum that pins at the decimal range limit instead of panicking.
///
/// Anything downstream of [`saturate`] must be added up through here so a
/// saturated input cannot overflow a total.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Largest representable magnitude carrying the sign of `value`
pub fn saturate(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}
