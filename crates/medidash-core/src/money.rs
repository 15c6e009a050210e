//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Register math in floating point:                                       │
//! │    100.00 + 45.50 - 0.10 - 0.20 = 145.20000000000002                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    10000 + 4550 - 10 - 20 = 14520  (exact, always)                      │
//! │                                                                         │
//! │  The REST backend speaks decimal numbers (100.00). Conversion happens  │
//! │  exactly once, at the DTO boundary, through the `decimal` serde helper. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medidash_core::money::Money;
//!
//! let opening = Money::from_cents(10_000); // 100.00
//! let sales = Money::from_major_minor(45, 50); // 45.50
//! assert_eq!((opening + sales).to_string(), "145.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: variances and refunds can be negative
/// - **Single field tuple struct**: serializes as a plain integer in snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use medidash_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(145, 50).cents(), 14550);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount as sent by the REST backend.
    ///
    /// Rounds to the nearest minor unit, so `0.1 + 0.2` lands on `0.30`.
    ///
    /// The float is rounded as stored: `45.505` is `45.50499…` in binary and
    /// becomes `45.50`. Use [`Money::parse_decimal`] when the amount arrives
    /// as text and exact half-up rounding matters.
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Parses a plain decimal string exactly, rounding half away from zero
    /// at the third decimal: `"45.505"` becomes `45.51`.
    ///
    /// Accepts an optional sign and at most one `.`. Returns `None` for
    /// anything else, including exponents, or when the amount does not fit.
    pub fn parse_decimal(input: &str) -> Option<Self> {
        let input = input.trim();
        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let cents = whole
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Returns the decimal representation for the wire.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax for this amount.
    ///
    /// Integer math with half-up rounding: `(amount * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use medidash_core::money::Money;
    /// use medidash_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large register totals from overflowing
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies a unit price by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds instead of wrapping.

/// Plain decimal rendering; currency symbols are a frontend concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Wire Format Helpers
// =============================================================================

/// Serde adapter for decimal amounts on the REST wire.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct OpenRegisterRequest {
///     #[serde(with = "medidash_core::money::decimal")]
///     opening_balance: Money,
/// }
/// ```
///
/// Deserialization accepts JSON numbers and numeric strings (`"100.00"`),
/// since the backend is not consistent about it.
pub mod decimal {
    use super::Money;
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as number or string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            Ok(Money::from_decimal(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            i64::try_from(v)
                .ok()
                .and_then(|v| v.checked_mul(100))
                .map(Money::from_cents)
                .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse_decimal(v).ok_or_else(|| E::custom(format!("invalid decimal amount: {v}")))
        }
    }
}

/// Optional variant of [`decimal`] for nullable amounts.
pub mod option_decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match money {
            Some(m) => serializer.serialize_some(&m.to_decimal()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::decimal")] Money);

        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(14550).to_string(), "145.50");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_decimal_conversion_is_exact_at_boundary() {
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(45.5).cents(), 4550);
        assert_eq!(Money::from_decimal(-5.5).cents(), -550);
        assert!((Money::from_cents(14550).to_decimal() - 145.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(450);
        assert_eq!((a - b).cents(), 550);
        assert_eq!((-b).cents(), -450);
        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 1900);
    }

    #[test]
    fn test_tax_rounding() {
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
        assert!(Money::from_cents(1000).calculate_tax(TaxRate::zero()).is_zero());
    }

    #[derive(Deserialize)]
    struct Wire {
        #[serde(with = "decimal")]
        amount: Money,
        #[serde(with = "option_decimal", default)]
        actual: Option<Money>,
    }

    #[test]
    fn test_decimal_serde_accepts_numbers_and_strings() {
        let w: Wire = serde_json::from_str(r#"{"amount": 100.5, "actual": "140.00"}"#).unwrap();
        assert_eq!(w.amount.cents(), 10050);
        assert_eq!(w.actual, Some(Money::from_cents(14000)));

        let w: Wire = serde_json::from_str(r#"{"amount": 7, "actual": null}"#).unwrap();
        assert_eq!(w.amount.cents(), 700);
        assert_eq!(w.actual, None);

        assert!(serde_json::from_str::<Wire>(r#"{"amount": "abc"}"#).is_err());
    }

    #[test]
    fn test_parse_decimal_rounds_half_up_exactly() {
        assert_eq!(Money::parse_decimal("45.505"), Some(Money::from_cents(4551)));
        assert_eq!(Money::parse_decimal("45.504"), Some(Money::from_cents(4550)));
        assert_eq!(Money::parse_decimal(" -5.5 "), Some(Money::from_cents(-550)));
        assert_eq!(Money::parse_decimal(".25"), Some(Money::from_cents(25)));
        assert_eq!(Money::parse_decimal("12"), Some(Money::from_cents(1200)));
        assert_eq!(Money::parse_decimal("1e3"), None);
        assert_eq!(Money::parse_decimal("-"), None);
        assert_eq!(Money::parse_decimal("99999999999999999999"), None);

        // the float path rounds the binary value
        assert_eq!(Money::from_decimal(45.505).cents(), 4550);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(Money::from_cents(2).multiply_quantity(i64::MAX), max);
        assert_eq!(Money::from_cents(-2) * i64::MAX, Money::from_cents(i64::MIN));
        assert_eq!(-Money::from_cents(i64::MIN), max);
    }

    #[test]
    fn test_decimal_serde_rejects_out_of_range_integers() {
        let json = format!(r#"{{"amount": {}, "actual": null}}"#, i64::MAX);
        assert!(serde_json::from_str::<Wire>(&json).is_err());
        let json = format!(r#"{{"amount": {}, "actual": null}}"#, u64::MAX);
        assert!(serde_json::from_str::<Wire>(&json).is_err());
    }
}
