//! # Price
//!
//! Strictly positive decimal amount used for unit and total prices.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive monetary amount.
///
/// # Examples
///
/// ```
/// use b2b_rfq::domain::value_objects::Price;
/// use rust_decimal::Decimal;
///
/// let unit = Price::new(Decimal::new(500, 2)).unwrap();
/// let total = unit.checked_mul_quantity(10).unwrap();
/// assert_eq!(total.value(), Decimal::new(5000, 2));
///
/// assert!(Price::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a price, rejecting zero and negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if `value <= 0`.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!(
                "price must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the decimal amount.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Multiplies the price by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` on overflow or a zero quantity.
    pub fn checked_mul_quantity(&self, quantity: u64) -> DomainResult<Self> {
        let product = self
            .0
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| DomainError::InvalidPrice("price overflow".to_string()))?;
        Self::new(product)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
