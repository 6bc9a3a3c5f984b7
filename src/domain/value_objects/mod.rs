//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`UserId`], [`ProductId`], [`CategoryId`], [`RfqId`], [`QuoteId`]:
//!   UUID-based identifiers
//!
//! ## Domain Types
//!
//! - [`Price`]: strictly positive decimal amount
//! - [`Role`]: marketplace role
//! - [`RfqStatus`]: RFQ lifecycle states
//! - [`Timestamp`]: UTC point in time

pub mod ids;
pub mod price;
pub mod rfq_status;
pub mod role;
pub mod timestamp;

pub use ids::{CategoryId, ProductId, QuoteId, RfqId, UserId};
pub use price::Price;
pub use rfq_status::{InvalidRfqStatusError, RfqStatus};
pub use role::{InvalidRoleError, Role};
pub use timestamp::Timestamp;
