use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use tracing::warn;

use crate::errors::LedgerError;

/// unwrap a checked result, or log the overflow and saturate at `Decimal::MAX`
///
/// The flag in the returned pair is set when the value was clamped.
pub(crate) fn clamp_overflow(value: Option<Decimal>, context: &str) -> (Decimal, bool) {
    match value {
        Some(v) => (v, false),
        None => {
            let err = LedgerError::NumericOverflow {
                context: context.to_string(),
            };
            warn!(error = %err, "clamping to the largest representable amount");
            (Decimal::MAX, true)
        }
    }
}

/// Money type with 8 decimal places of working precision
///
/// Ledger figures are reported at 2 places; the extra places keep period
/// interest exact enough that rounding only happens once, at the report
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);
    pub const MAX: Money = Money(Decimal::MAX);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?.round_dp(8)))
    }

    /// create from whole currency units (rupees, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor units (paise, cents) at the given scale
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money(Decimal::new(amount, scale).round_dp(8))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// round to whole paise, halves away from zero
    pub fn round_cents(&self) -> Self {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// subtract, flooring the result at zero
    pub fn saturating_sub(self, other: Self) -> Self {
        (self - other).max(Money::ZERO)
    }

    /// checked addition, `None` when the sum leaves the decimal range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money::from_decimal)
    }

    /// checked multiplication, `None` when the product leaves the decimal range
    pub fn checked_mul(self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Money::from_decimal)
    }

    /// checked form of [`Money::percentage`]
    pub fn checked_percentage(self, rate: Rate) -> Option<Self> {
        self.checked_mul(rate.as_decimal())
    }

    /// add, saturating at `Money::MAX` and setting `clamped` on overflow
    pub fn clamped_add(self, other: Self, context: &str, clamped: &mut bool) -> Self {
        let (sum, overflowed) = clamp_overflow(self.0.checked_add(other.0), context);
        *clamped |= overflowed;
        Money::from_decimal(sum)
    }

    /// calculate percentage (e.g., 3% of 100000)
    pub fn percentage(&self, rate: Rate) -> Self {
        Money((self.0 * rate.as_decimal()).round_dp(8))
    }

    /// simple interest at a monthly rate over a fractional number of months
    pub fn monthly_interest(&self, monthly_rate: Rate, months: Decimal) -> Self {
        Money((self.0 * monthly_rate.as_decimal() * months).round_dp(8))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(8))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(8);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(8))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(8);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(8))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// rate type for interest rates and advance ratios, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal fraction (e.g., 0.03 for 3%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a percentage figure (e.g., 3 or 2.5)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// create from basis points (e.g., 300 for 3%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10_000))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// annualized equivalent of a monthly rate, without compounding
    pub fn annualized(&self) -> Rate {
        Rate(self.0 * Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

/// serde adapter that reads and writes a [`Rate`] as a percentage figure
///
/// ```
/// use pawn_ledger_rs::decimal::Rate;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Card {
///     #[serde(with = "pawn_ledger_rs::decimal::percent")]
///     rate: Rate,
/// }
///
/// let card: Card = serde_json::from_str(r#"{ "rate": 3 }"#).unwrap();
/// assert_eq!(card.rate.as_decimal().to_string(), "0.03");
/// ```
pub mod percent {
    use super::Rate;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(rate: &Rate, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&rate.as_percentage(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rate, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Rate::from_percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679");
        assert_eq!(m.round_cents().to_string(), "100.12");
        assert_eq!(Money::from_str_exact("0.125").unwrap().round_cents().to_string(), "0.13");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(150_050, 2), Money::from_str_exact("1500.50").unwrap());
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let a = Money::from_major(100);
        let b = Money::from_major(250);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a), Money::from_major(150));
    }

    #[test]
    fn test_monthly_interest() {
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percentage(dec!(3));

        let one_month = principal.monthly_interest(rate, Decimal::ONE);
        assert_eq!(one_month, Money::from_major(3_000));

        let half_month = principal.monthly_interest(rate, dec!(0.5));
        assert_eq!(half_month, Money::from_major(1_500));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percentage(dec!(2.5));
        assert_eq!(rate.as_decimal(), dec!(0.025));
        assert_eq!(rate.to_string(), "2.5%");
        assert_eq!(Rate::from_bps(300), Rate::from_percentage(dec!(3)));
        assert_eq!(rate.annualized().as_percentage(), dec!(30));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(Money::MAX.checked_add(Money::ONE).is_none());
        assert_eq!(Money::ONE.checked_add(Money::ONE), Some(Money::from_major(2)));
    }

    #[test]
    fn test_checked_mul_overflow() {
        assert!(Money::MAX.checked_mul(dec!(2)).is_none());
        assert!(Money::MAX.checked_percentage(Rate::from_percentage(dec!(1000))).is_none());
        assert_eq!(
            Money::from_major(100_000).checked_percentage(Rate::from_percentage(dec!(3))),
            Some(Money::from_major(3_000))
        );
    }

    #[test]
    fn test_clamped_add_saturates() {
        let mut clamped = false;
        let sum = Money::from_major(1).clamped_add(Money::from_major(2), "test sum", &mut clamped);
        assert_eq!(sum, Money::from_major(3));
        assert!(!clamped);

        let sum = Money::MAX.clamped_add(Money::MAX, "test sum", &mut clamped);
        assert_eq!(sum, Money::MAX);
        assert!(clamped);

        // the flag stays set once raised
        Money::ONE.clamped_add(Money::ONE, "test sum", &mut clamped);
        assert!(clamped);
    }
}
