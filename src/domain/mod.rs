//! # Domain Layer
//!
//! Entities, value objects and business rules of the RFQ negotiation
//! lifecycle. Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
