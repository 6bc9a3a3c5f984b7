//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Rfq`]: Request-for-Quote aggregate with state machine
//!
//! ## Entities
//!
//! - [`Quote`]: Supplier price offer against an RFQ
//! - [`User`], [`Principal`]: Directory record and authenticated caller
//! - [`Product`], [`Category`]: Catalog entries referenced by RFQs

pub mod product;
pub mod quote;
pub mod rfq;
pub mod user;

pub use product::{Category, Product};
pub use quote::Quote;
pub use rfq::{DEFAULT_VALIDITY_DAYS, Rfq, RfqBuilder};
pub use user::{Principal, User};

/// Trims a free-form note, mapping blank input to `None`.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
