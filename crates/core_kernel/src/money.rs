//! Money type with precise decimal arithmetic
//!
//! Every account in the ledger is denominated in a single, implicit currency,
//! so `Money` is a thin wrapper over `rust_decimal::Decimal`. Amounts are
//! stored with 4 decimal places and all arithmetic is exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places kept internally
pub const MONEY_SCALE: u32 = 4;

/// Exclusive upper bound on the whole-unit magnitude of an amount
///
/// Two amounts below this bound at [`MONEY_SCALE`] places always sum to a
/// value `Decimal` represents exactly.
pub const MONEY_LIMIT: i128 = 1_000_000_000_000_000_000_000_000;

/// Errors that can occur during money operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount
///
/// Money uses rust_decimal for precise arithmetic without floating-point errors.
/// Values are rounded to [`MONEY_SCALE`] places on construction so that two
/// amounts that print the same also compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: amount.round_dp(MONEY_SCALE),
        }
    }

    /// Creates Money, rejecting amounts that would lose precision
    ///
    /// Unlike [`Money::new`] this never rounds: more than [`MONEY_SCALE`]
    /// significant decimal places, or a magnitude at or above
    /// [`MONEY_LIMIT`], is an `InvalidAmount`.
    pub fn try_new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(MoneyError::InvalidAmount(format!(
                "{} has more than {} decimal places",
                amount, MONEY_SCALE
            )));
        }
        if !within_limit(amount) {
            return Err(MoneyError::InvalidAmount(format!(
                "{} exceeds the supported magnitude",
                amount
            )));
        }
        Ok(Self::new(amount))
    }

    /// Creates Money from an integer amount in minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, 2))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
        }
    }

    /// Rounds to whole cents using banker's rounding (round half to even)
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                2,
                rust_decimal::RoundingStrategy::MidpointNearestEven,
            ),
        }
    }

    /// Returns true if the amount is below [`MONEY_LIMIT`] in magnitude
    pub fn is_within_limit(&self) -> bool {
        within_limit(self.amount)
    }

    /// Checked addition
    ///
    /// Fails with `Overflow` when an operand or the result reaches
    /// [`MONEY_LIMIT`]. `Decimal` silently drops scale near its own maximum,
    /// so results outside the limit cannot be trusted to be exact.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.exact(other, Decimal::checked_add)
    }

    /// Checked subtraction, bounded like [`Money::checked_add`]
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.exact(other, Decimal::checked_sub)
    }

    fn exact(
        &self,
        other: &Money,
        op: fn(Decimal, Decimal) -> Option<Decimal>,
    ) -> Result<Money, MoneyError> {
        if !self.is_within_limit() || !other.is_within_limit() {
            return Err(MoneyError::Overflow);
        }
        let result = op(self.amount, other.amount).ok_or(MoneyError::Overflow)?;
        if !within_limit(result) {
            return Err(MoneyError::Overflow);
        }
        Ok(Self { amount: result })
    }
}

fn within_limit(amount: Decimal) -> bool {
    amount.abs() < Decimal::from_i128_with_scale(MONEY_LIMIT, 0)
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal {
        money.amount
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::InvalidAmount("amount must not be empty".to_string()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))?;
        Self::try_new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other).expect("Overflow in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other).expect("Overflow in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
        assert_eq!((-a).amount(), dec!(-100.00));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(&Money::new(dec!(1))), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_add_near_limit_is_an_overflow_not_a_rounding() {
        let huge = Money::new(dec!(9000000000000000000000000));
        let tiny = Money::new(dec!(0.0001));

        assert_eq!(huge.checked_add(&tiny), Err(MoneyError::Overflow));
        assert_eq!(tiny.checked_sub(&huge), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sum_reaching_limit_is_an_overflow() {
        let largest = Money::new(dec!(999999999999999999999999.9999));
        assert!(largest.is_within_limit());
        assert_eq!(
            largest.checked_add(&Money::new(dec!(0.0001))),
            Err(MoneyError::Overflow)
        );
        assert_eq!(
            largest.checked_add(&Money::new(dec!(-0.0001))).unwrap().amount(),
            dec!(999999999999999999999999.9998)
        );
    }

    #[test]
    fn test_try_new_rejects_extra_precision() {
        assert!(matches!(
            Money::try_new(dec!(0.00004)),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert_eq!(Money::try_new(dec!(1.50000)).unwrap(), Money::new(dec!(1.5)));
    }

    #[test]
    fn test_parse_rejects_sub_scale_amounts() {
        assert!(matches!("0.00004".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(
            "1000000000000000000000000".parse::<Money>(),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_trailing_zeros_compare_equal() {
        assert_eq!(Money::new(dec!(100.00)), Money::new(dec!(100)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_arithmetic_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a);
            let mb = Money::from_minor(b);
            let mc = Money::from_minor(c);

            prop_assert_eq!((ma + mb) + mc, ma + (mb + mc));
        }

        #[test]
        fn add_then_sub_restores_original(
            a in -1_000_000_000i64..1_000_000_000i64,
            b in -1_000_000_000i64..1_000_000_000i64
        ) {
            let ma = Money::from_minor(a);
            let mb = Money::from_minor(b);

            prop_assert_eq!(ma.checked_add(&mb).unwrap().checked_sub(&mb).unwrap(), ma);
        }
    }
}
