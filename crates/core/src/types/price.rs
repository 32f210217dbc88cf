//! Fixed-point currency amounts.
//!
//! Prices are stored as `NUMERIC(18,2)`, so every [`Price`] is non-negative,
//! below 10^16 and carries exactly two decimal places.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more than two decimal places.
    #[error("price must have at most 2 decimal places (got {0})")]
    TooPrecise(Decimal),
    /// The amount does not fit a `NUMERIC(18,2)` column.
    #[error("price must be below 10000000000000000 (got {0})")]
    TooLarge(Decimal),
}

/// A non-negative currency amount with two decimal places.
///
/// ```
/// use rust_decimal::Decimal;
/// use store_manager_core::Price;
///
/// let price = Price::new(Decimal::new(5, 0)).unwrap();
/// assert_eq!(price.to_string(), "5.00");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// assert!(Price::new(Decimal::new(1005, 3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places every price carries.
    pub const SCALE: u32 = 2;

    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, Self::SCALE));

    /// Exclusive upper bound of a stored amount (10^16).
    pub const LIMIT: Decimal = Decimal::from_parts(0x6FC1_0000, 0x0023_86F2, 0, false, 0);

    /// Validate an amount and normalise it to two decimal places.
    ///
    /// Trailing zeros beyond the second place are accepted (`1.500` is
    /// `1.50`); significant digits beyond it are not.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero,
    /// [`PriceError::TooLarge`] for amounts at or above [`Price::LIMIT`] and
    /// [`PriceError::TooPrecise`] when rounding to cents would lose value.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount >= Self::LIMIT {
            return Err(PriceError::TooLarge(amount));
        }
        Self::aggregate(amount)
    }

    /// Validate a sum of prices.
    ///
    /// Sums are never written to a price column, so only sign and precision
    /// are checked.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] or [`PriceError::TooPrecise`].
    pub fn aggregate(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(PriceError::TooPrecise(amount));
        }

        let mut cents = normalized;
        cents.rescale(Self::SCALE);
        // -0.00 compares equal to zero but prints with a sign
        cents.set_sign_positive(true);
        Ok(Self(cents))
    }

    /// Build a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), Self::SCALE))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_normalizes_to_two_places() {
        assert_eq!(Price::new(dec("50")).unwrap().to_string(), "50.00");
        assert_eq!(Price::new(dec("49.9")).unwrap().to_string(), "49.90");
        assert_eq!(Price::new(dec("1.500")).unwrap().to_string(), "1.50");
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_new_accepts_negative_zero() {
        assert_eq!(Price::new(dec("-0.00")).unwrap(), Price::ZERO);
        assert_eq!(Price::new(dec("-0.00")).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_new_rejects_sub_cent_amounts() {
        assert!(matches!(
            Price::new(dec("10.005")),
            Err(PriceError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_limit_is_ten_to_the_sixteenth() {
        assert_eq!(Price::LIMIT, dec("10000000000000000"));
    }

    #[test]
    fn test_new_accepts_largest_column_value() {
        let max = Price::new(dec("9999999999999999.99")).unwrap();
        assert_eq!(max.to_string(), "9999999999999999.99");
    }

    #[test]
    fn test_new_rejects_amounts_beyond_column() {
        assert!(matches!(
            Price::new(dec("10000000000000000")),
            Err(PriceError::TooLarge(_))
        ));
        assert!(matches!(
            Price::new(dec("100000000000000000.00")),
            Err(PriceError::TooLarge(_))
        ));
    }

    #[test]
    fn test_aggregate_allows_sums_beyond_column() {
        let sum = Price::aggregate(dec("20000000000000000.00")).unwrap();
        assert_eq!(sum.to_string(), "20000000000000000.00");
        assert!(Price::aggregate(dec("-1")).is_err());
    }

    #[test]
    fn test_serde_rejects_oversized_amounts() {
        assert!(serde_json::from_str::<Price>("\"10000000000000000.00\"").is_err());
    }

    #[test]
    fn test_sum_counts_every_item() {
        let ten = Price::from_cents(1000);
        let total: Price = [ten, ten].iter().sum();
        assert_eq!(total, Price::from_cents(2000));
        assert_eq!(total.to_string(), "20.00");
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = std::iter::empty::<Price>().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("50.5").unwrap();
        let from_string: Price = serde_json::from_str("\"50.50\"").unwrap();
        assert_eq!(from_number, from_string);

        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(5000)).unwrap();
        assert_eq!(json, "\"50.00\"");
    }
}
