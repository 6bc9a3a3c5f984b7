//! # Catalog
//!
//! Products and categories referenced by RFQs. Read-only for the
//! negotiation core; the in-memory store is populated at startup.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryCatalog;
pub use traits::{CatalogError, CatalogResult, CatalogStore};
