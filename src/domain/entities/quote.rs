//! # Quote Entity
//!
//! A supplier's priced answer to an [`Rfq`].
//!
//! Quotes are immutable once recorded. The total is derived from the unit
//! price and the RFQ quantity at submission time.
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::domain::entities::{Quote, RfqBuilder};
//! use b2b_rfq::domain::value_objects::{Price, ProductId, Timestamp, UserId};
//! use rust_decimal::Decimal;
//!
//! let now = Timestamp::now();
//! let rfq = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 10)
//!     .created_at(now)
//!     .try_build()
//!     .unwrap();
//! let price = Price::new(Decimal::new(500, 2)).unwrap();
//!
//! let quote = Quote::new(&rfq, UserId::new_v4(), price, "3 days", None, now).unwrap();
//! assert_eq!(quote.total_price().value(), Decimal::new(5000, 2));
//! ```

use crate::domain::entities::normalize_note;
use crate::domain::entities::rfq::Rfq;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Price, QuoteId, RfqId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supplier quote against an RFQ.
///
/// # Invariants
///
/// - `total_price == price_per_unit * rfq.quantity`
/// - `delivery_time` is not blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    id: QuoteId,
    rfq_id: RfqId,
    supplier_id: UserId,
    price_per_unit: Price,
    total_price: Price,
    delivery_time: String,
    message: Option<String>,
    created_at: Timestamp,
}

impl Quote {
    /// Creates a quote for `rfq`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if `delivery_time` is blank.
    /// Returns `DomainError::InvalidPrice` if the total overflows.
    pub fn new(
        rfq: &Rfq,
        supplier_id: UserId,
        price_per_unit: Price,
        delivery_time: impl Into<String>,
        message: Option<String>,
        created_at: Timestamp,
    ) -> DomainResult<Self> {
        let delivery_time = delivery_time.into().trim().to_string();
        if delivery_time.is_empty() {
            return Err(DomainError::ValidationError(
                "delivery_time must not be blank".to_string(),
            ));
        }
        let total_price = price_per_unit.checked_mul_quantity(rfq.quantity())?;

        Ok(Self {
            id: QuoteId::new_v4(),
            rfq_id: rfq.id(),
            supplier_id,
            price_per_unit,
            total_price,
            delivery_time,
            message: normalize_note(message),
            created_at,
        })
    }

    /// Reconstructs a quote from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: QuoteId,
        rfq_id: RfqId,
        supplier_id: UserId,
        price_per_unit: Price,
        total_price: Price,
        delivery_time: String,
        message: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            rfq_id,
            supplier_id,
            price_per_unit,
            total_price,
            delivery_time,
            message,
            created_at,
        }
    }

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns the RFQ this quote answers.
    #[inline]
    #[must_use]
    pub fn rfq_id(&self) -> RfqId {
        self.rfq_id
    }

    /// Returns the quoting supplier.
    #[inline]
    #[must_use]
    pub fn supplier_id(&self) -> UserId {
        self.supplier_id
    }

    /// Returns the unit price.
    #[inline]
    #[must_use]
    pub fn price_per_unit(&self) -> Price {
        self.price_per_unit
    }

    /// Returns the total for the requested quantity.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Returns the promised delivery time.
    #[inline]
    #[must_use]
    pub fn delivery_time(&self) -> &str {
        &self.delivery_time
    }

    /// Returns the supplier's note.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns when the quote was submitted.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} for {} @ {} by {})",
            self.id, self.rfq_id, self.price_per_unit, self.supplier_id
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::rfq::RfqBuilder;
    use crate::domain::value_objects::ProductId;
    use rust_decimal::Decimal;

    fn rfq(quantity: u64) -> Rfq {
        RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), quantity)
            .try_build()
            .unwrap()
    }

    #[test]
    fn total_is_unit_price_times_quantity() {
        let rfq = rfq(100);
        let price = Price::new(Decimal::new(1250, 2)).unwrap();
        let quote =
            Quote::new(&rfq, UserId::new_v4(), price, "2 weeks", None, Timestamp::now()).unwrap();

        assert_eq!(quote.rfq_id(), rfq.id());
        assert_eq!(quote.total_price().value(), Decimal::new(1250, 0));
    }

    #[test]
    fn blank_delivery_time_is_rejected() {
        let rfq = rfq(1);
        let price = Price::new(Decimal::ONE).unwrap();
        let result = Quote::new(&rfq, UserId::new_v4(), price, "  ", None, Timestamp::now());

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn delivery_time_is_trimmed() {
        let rfq = rfq(1);
        let price = Price::new(Decimal::ONE).unwrap();
        let quote = Quote::new(
            &rfq,
            UserId::new_v4(),
            price,
            " 5 days ",
            Some("net 30".to_string()),
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(quote.delivery_time(), "5 days");
        assert_eq!(quote.message(), Some("net 30"));
    }
}
