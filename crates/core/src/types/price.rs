//! Type-safe price representation using decimal arithmetic.
//!
//! Prices use [`rust_decimal::Decimal`] rather than floats so that cart
//! totals are exact. SQLite has no decimal column type, so prices are
//! persisted as canonical decimal text.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// Prices must be strictly positive.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The input string is not a valid decimal number.
    #[error("invalid price: {0}")]
    InvalidDecimal(String),
}

/// A strictly positive money amount.
///
/// ## Examples
///
/// ```
/// use rummage_core::Price;
///
/// let price = Price::parse("74.99").unwrap();
/// assert_eq!(price.to_string(), "74.99");
///
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("-1.50").is_err());
/// assert!(Price::parse("cheap").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Parse a `Price` from decimal text (e.g. `"74.99"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is not
    /// strictly positive.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::InvalidDecimal(s.to_owned()))?;
        Self::new(amount)
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

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with sqlite feature): stored as TEXT
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        let amount = Decimal::from_str(&s)?;
        // Database values are assumed valid; positivity was checked on write
        Ok(Self(amount))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let price = Price::parse("74.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(7499, 2));
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        assert!(matches!(Price::parse("0"), Err(PriceError::NotPositive)));
        assert!(matches!(
            Price::parse("-3.50"),
            Err(PriceError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Price::parse("cheap"),
            Err(PriceError::InvalidDecimal(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let price = Price::parse("74.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"74.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
