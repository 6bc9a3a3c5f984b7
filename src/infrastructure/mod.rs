//! # Infrastructure Layer
//!
//! Adapters behind the ports the application layer depends on.
//!
//! - [`persistence`]: RFQ and quote storage
//! - [`identity`]: bearer credentials and the user directory
//! - [`catalog`]: products and categories

pub mod catalog;
pub mod identity;
pub mod persistence;
