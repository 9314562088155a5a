//! Type-safe price representation using decimal arithmetic.
//!
//! The commerce backend serializes prices as decimal strings (e.g. "6.00"),
//! which `rust_decimal`'s serde-with-str feature maps directly onto
//! [`Decimal`]. All prices on this site are USD.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A USD price.
///
/// Wraps a [`Decimal`] amount in dollars (not cents). Display formats to two
/// decimal places with a dollar sign, e.g. `$16.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Sum an iterator of prices.
    pub fn total(prices: impl IntoIterator<Item = Self>) -> Self {
        Self(prices.into_iter().map(|p| p.0).sum())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromStr;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(price("6").to_string(), "$6.00");
        assert_eq!(price("4.5").to_string(), "$4.50");
        assert_eq!(price("16.50").to_string(), "$16.50");
        assert_eq!(price("0").to_string(), "$0.00");
    }

    #[test]
    fn test_total() {
        // qty 2 @ $6.00 and qty 1 @ $4.50
        let total = Price::total([price("12.00"), price("4.50")]);
        assert_eq!(total.to_string(), "$16.50");
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(Price::total([]), Price::zero());
    }

    #[test]
    fn test_add() {
        assert_eq!(price("1.25") + price("2.75"), price("4.00"));
    }

    #[test]
    fn test_deserialize_from_decimal_string() {
        // The backend sends prices as strings
        let p: Price = serde_json::from_str("\"4.50\"").unwrap();
        assert_eq!(p, price("4.50"));
    }
}
