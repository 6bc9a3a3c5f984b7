//! # Application Layer
//!
//! Use cases of the negotiation lifecycle, built on the domain model and
//! the infrastructure traits.

pub mod commands;
pub mod error;
pub mod services;

pub use commands::{CreateRfq, SubmitQuote};
pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    DashboardStats, ExpirySweeper, NegotiationConfig, NegotiationCoordinator, QuoteSubmission,
};
