//! # b2b-rfq
//!
//! Request-for-quote negotiation core for a B2B marketplace.
//!
//! Buyers raise RFQs against catalog products, suppliers answer with
//! priced quotes, and a buyer closes an RFQ by accepting one of them.
//! RFQs expire once their validity window passes.
//!
//! # Layers
//!
//! - [`domain`]: entities, value objects and the role capability table
//! - [`application`]: the negotiation commands and background expiry
//! - [`infrastructure`]: storage, identity and catalog adapters
//! - [`api`]: the REST surface
//! - [`config`] and [`bootstrap`]: service configuration and wiring

pub mod api;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
