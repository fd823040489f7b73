//! Money types with exact minor-unit arithmetic
//!
//! Monetary values are stored as an integer count of minor units (cents)
//! plus an ISO 4217 currency code. Repeated discount and tax arithmetic on
//! binary floats drifts, so floats never appear anywhere in this module;
//! `rust_decimal` is used for intermediate quantity and percentage math.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    BRL,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Minor units per major unit (100 for cent currencies, 1 for JPY)
    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount stored as integer minor units with its currency
///
/// Addition and subtraction are exact integer operations. Multiplication by
/// a quantity or percentage goes through `Decimal` and rounds half-up to the
/// nearest minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Creates Money from a decimal major-unit amount, rounding half-up
    /// to the nearest minor unit
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let scaled = amount
            .checked_mul(Decimal::from(currency.minor_per_major()))
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let minor = scaled.to_i64().ok_or(MoneyError::Overflow)?;
        Ok(Self { minor, currency })
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Returns the amount in minor units
    pub fn minor(&self) -> i64 {
        self.minor
    }

    /// Returns the amount in major units as a decimal
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.minor, self.currency.decimal_places())
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            minor: self.minor.saturating_abs(),
            currency: self.currency,
        }
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }

    /// Checked addition; fails on currency mismatch or i64 overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self {
            minor,
            currency: self.currency,
        })
    }

    /// Checked subtraction; fails on currency mismatch or i64 overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self {
            minor,
            currency: self.currency,
        })
    }

    /// Multiplies by a unitless quantity, rounding half-up to the nearest
    /// minor unit
    pub fn multiply_quantity(&self, quantity: Decimal) -> Result<Money, MoneyError> {
        let scaled = Decimal::from(self.minor)
            .checked_mul(quantity)
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let minor = scaled.to_i64().ok_or(MoneyError::Overflow)?;
        Ok(Self {
            minor,
            currency: self.currency,
        })
    }

    /// Returns this amount as a fraction of `whole`
    ///
    /// Division between Money values yields a [`Ratio`], never Money; the
    /// only use for Money division is progress percentages.
    pub fn ratio_of(&self, whole: &Money) -> Result<Ratio, MoneyError> {
        self.ensure_same_currency(whole)?;
        if whole.minor == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Ratio::new(
            Decimal::from(self.minor) / Decimal::from(whole.minor),
        ))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency.symbol(), self.amount())
    }
}

impl PartialOrd for Money {
    /// Ordering is only defined between amounts of the same currency
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.minor.cmp(&other.minor))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            minor: self.minor.saturating_neg(),
            currency: self.currency,
        }
    }
}

/// Represents a percentage rate (e.g., a line-item discount)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.10 for 10%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.10 for 10%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 10.0 for 10%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to an amount, rounding half-up to the nearest
    /// minor unit
    pub fn apply(&self, money: &Money) -> Result<Money, MoneyError> {
        money.multiply_quantity(self.value)
    }

    /// Returns the complement rate (e.g., 10% discount -> 90% payable)
    pub fn complement(&self) -> Self {
        Self {
            value: Decimal::ONE - self.value,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4))
    }
}

/// The result of dividing one Money amount by another
///
/// Used for settlement-progress displays; deliberately not a Money so it
/// cannot be fed back into balance arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    value: Decimal,
}

impl Ratio {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the ratio as a decimal (1.0 = 100%)
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the ratio as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::BRL);
        assert_eq!(m.minor(), 10050);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::BRL);
    }

    #[test]
    fn test_money_from_decimal_rounds_half_up() {
        let m = Money::from_decimal(dec!(1.005), Currency::USD).unwrap();
        assert_eq!(m.minor(), 101);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_minor(10000, Currency::USD);
        let b = Money::from_minor(5000, Currency::USD);

        assert_eq!(a.checked_add(&b).unwrap().minor(), 15000);
        assert_eq!(a.checked_sub(&b).unwrap().minor(), 5000);
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::from_minor(10000, Currency::USD);
        let brl = Money::from_minor(10000, Currency::BRL);

        let result = usd.checked_add(&brl);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_overflow_detected() {
        let a = Money::from_minor(i64::MAX, Currency::USD);
        let b = Money::from_minor(1, Currency::USD);

        assert_eq!(a.checked_add(&b), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_multiply_quantity_rounds_half_up() {
        // 333 minor units * 1.5 = 499.5 -> 500
        let m = Money::from_minor(333, Currency::USD);
        assert_eq!(m.multiply_quantity(dec!(1.5)).unwrap().minor(), 500);
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(10));
        let amount = Money::from_minor(10000, Currency::BRL);

        assert_eq!(rate.apply(&amount).unwrap().minor(), 1000);
        assert_eq!(rate.complement().apply(&amount).unwrap().minor(), 9000);
    }

    #[test]
    fn test_ratio_of() {
        let paid = Money::from_minor(4000, Currency::BRL);
        let total = Money::from_minor(9500, Currency::BRL);

        let ratio = paid.ratio_of(&total).unwrap();
        assert!(ratio.as_percentage() > dec!(42.1));
        assert!(ratio.as_percentage() < dec!(42.2));
    }

    #[test]
    fn test_ratio_division_by_zero() {
        let paid = Money::from_minor(4000, Currency::BRL);
        let zero = Money::zero(Currency::BRL);

        assert_eq!(paid.ratio_of(&zero), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_ordering_same_currency_only() {
        let a = Money::from_minor(100, Currency::USD);
        let b = Money::from_minor(200, Currency::USD);
        let c = Money::from_minor(200, Currency::EUR);

        assert!(a < b);
        assert_eq!(a.partial_cmp(&c), None);
    }

    #[test]
    fn test_jpy_has_no_minor_fraction() {
        let m = Money::from_minor(500, Currency::JPY);
        assert_eq!(m.amount(), dec!(500));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn addition_is_commutative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::BRL);
            let mb = Money::from_minor(b, Currency::BRL);

            prop_assert_eq!(
                ma.checked_add(&mb).unwrap(),
                mb.checked_add(&ma).unwrap()
            );
        }

        #[test]
        fn subtraction_inverts_addition(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::BRL);
            let mb = Money::from_minor(b, Currency::BRL);

            let sum = ma.checked_add(&mb).unwrap();
            prop_assert_eq!(sum.checked_sub(&mb).unwrap(), ma);
        }

        #[test]
        fn percent_of_amount_never_exceeds_amount(
            minor in 0i64..1_000_000_000i64,
            pct in 0u32..=100u32
        ) {
            let m = Money::from_minor(minor, Currency::BRL);
            let rate = Rate::from_percentage(Decimal::from(pct));
            let part = rate.apply(&m).unwrap();

            prop_assert!(part.minor() <= m.minor());
            prop_assert!(part.minor() >= 0);
        }
    }
}
