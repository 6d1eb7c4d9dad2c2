//! Amount type for monetary values entered in chat or read from sheet cells.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! parsing values that may use either `.` or `,` as the decimal separator.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a non-negative monetary amount.
///
/// This type wraps `Decimal` and provides parsing for the two decimal
/// separators users type in chat (`12.50` and `12,50` are the same value).
/// Negative values are rejected: a transaction amount or a limit is never
/// below zero.
///
/// # Examples
///
/// Comma as the decimal separator:
/// ```
/// # use kassa_bot::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("12,50").unwrap();
/// let b = Amount::from_str("12.50").unwrap();
/// assert_eq!(a.value(), b.value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(String);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // An empty sheet cell reads as zero.
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Accept the comma decimal separator.
        let normalized = trimmed.replace(',', ".");

        let value = Decimal::from_str(&normalized)
            .map_err(|e| AmountError(format!("'{trimmed}' is not a number: {e}")))?;
        if value.is_sign_negative() {
            return Err(AmountError(format!("'{trimmed}' is negative")));
        }
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Strip trailing zeros so "1500.00" renders as "1500".
        write!(f, "{}", self.0.normalize())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_period() {
        let amount = Amount::from_str("12.50").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("12.50").unwrap());
    }

    #[test]
    fn test_parse_with_comma() {
        let amount = Amount::from_str("12,50").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_comma_equals_period() {
        let comma = Amount::from_str("12,50").unwrap();
        let period = Amount::from_str("12.50").unwrap();
        assert_eq!(comma.value(), period.value());
    }

    #[test]
    fn test_parse_integer() {
        let amount = Amount::from_str("1500").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1500").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  1500 ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1500").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_non_numeric() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("12.5x").is_err());
    }

    #[test]
    fn test_parse_negative_rejected() {
        assert!(Amount::from_str("-5").is_err());
        assert!(Amount::from_str("-5,50").is_err());
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        let amount = Amount::from_str("1500.00").unwrap();
        assert_eq!(amount.to_string(), "1500");
        let amount = Amount::from_str("12,50").unwrap();
        assert_eq!(amount.to_string(), "12.5");
    }

    #[test]
    fn test_serde_round_trip() {
        let amount = Amount::from_str("42,5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"42.5\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), amount.value());
    }
}
