//! # In-Memory Repositories
//!
//! In-memory implementations without database dependencies.
//!
//! ## Available Repositories
//!
//! - [`InMemoryNegotiationStore`]: RFQ and quote persistence
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<HashMap>>` for thread-safe access.

pub mod negotiation_store;

pub use negotiation_store::InMemoryNegotiationStore;
