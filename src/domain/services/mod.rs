//! # Domain Services
//!
//! Domain services encapsulating business rules that don't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`authorization`]: Role capability table consulted by every command

pub mod authorization;

pub use authorization::{Access, Action, AuthorizationError};
