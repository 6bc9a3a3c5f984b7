//! # Commands
//!
//! Input payloads of the negotiation commands. Fields arrive unvalidated;
//! the services reject bad values with `ApplicationError::Validation`.

use crate::domain::value_objects::{ProductId, RfqId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raise a new RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRfq {
    /// Product to price.
    pub product_id: ProductId,
    /// Requested quantity; must be positive.
    pub quantity: i64,
    /// Optional note to suppliers.
    #[serde(default)]
    pub message: Option<String>,
    /// Validity window in days; the configured default applies when absent.
    #[serde(default)]
    pub validity_days: Option<i64>,
}

/// Answer an RFQ with a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQuote {
    /// RFQ being answered.
    pub rfq_id: RfqId,
    /// Unit price; must be positive.
    pub price_per_unit: Decimal,
    /// Promised delivery time, free-form.
    pub delivery_time: String,
    /// Optional note to the buyer.
    #[serde(default)]
    pub message: Option<String>,
}
