//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`NegotiationCoordinator`]: Role-gated command surface
//! - [`RfqRegistry`]: RFQ lifecycle and expiry
//! - [`QuoteLedger`]: Supplier quote submission
//! - [`StatsAggregator`]: Dashboard counters
//! - [`ExpirySweeper`]: Background expiry task

pub mod expiry_sweeper;
pub mod negotiation;
pub mod quote_ledger;
pub mod rfq_registry;
pub mod stats;

pub use expiry_sweeper::{DEFAULT_SWEEP_INTERVAL, ExpirySweeper};
pub use negotiation::{NegotiationConfig, NegotiationCoordinator};
pub use quote_ledger::{QuoteLedger, QuoteSubmission};
pub use rfq_registry::{RfqLocks, RfqRegistry};
pub use stats::{DashboardStats, StatsAggregator};
