//! # Persistence Layer
//!
//! Repository ports and their implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`RfqRepository`]: Persistence for RFQ aggregates
//! - [`QuoteRepository`]: Persistence for quotes
//! - [`NegotiationStore`]: Atomic quote commit over both
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryNegotiationStore;
pub use traits::{
    NegotiationStore, QuoteRepository, RepositoryError, RepositoryResult, RfqRepository,
};
