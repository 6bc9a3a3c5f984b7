//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that abstract
//! persistence operations. The shipped implementation is in-memory; a
//! database backend only has to honor the same version checks.
//!
//! # Available Repositories
//!
//! - [`RfqRepository`]: Persistence for RFQ aggregates
//! - [`QuoteRepository`]: Persistence for quotes
//! - [`NegotiationStore`]: Both of the above plus the atomic quote commit
//!
//! # Examples
//!
//! ```ignore
//! use b2b_rfq::infrastructure::persistence::traits::RfqRepository;
//!
//! async fn count_open(repo: &impl RfqRepository) {
//!     let open = repo.count_by_status(RfqStatus::Open, Timestamp::now()).await.unwrap();
//!     println!("{open} RFQs are open");
//! }
//! ```

use crate::domain::entities::{Quote, Rfq};
use crate::domain::value_objects::{QuoteId, RfqId, RfqStatus, Timestamp, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict: {entity_type} with id {id} has been modified")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for RFQ aggregates.
///
/// Status filters and counts apply the expiry predicate at `now`, so an
/// `open` RFQ past its window is counted as `expired` even before the
/// stored record catches up.
#[async_trait]
pub trait RfqRepository: Send + Sync + fmt::Debug {
    /// Inserts a new RFQ.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the ID is already taken.
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()>;

    /// Replaces a stored RFQ if its version still equals `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the RFQ does not exist.
    /// Returns `RepositoryError::VersionConflict` if the RFQ has been
    /// modified since it was loaded.
    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()>;

    /// Gets an RFQ by ID.
    ///
    /// Returns `None` if the RFQ does not exist.
    async fn get(&self, id: &RfqId) -> RepositoryResult<Option<Rfq>>;

    /// Returns every RFQ.
    async fn find_all(&self) -> RepositoryResult<Vec<Rfq>>;

    /// Returns the RFQs raised by a buyer.
    async fn find_by_buyer(&self, buyer_id: &UserId) -> RepositoryResult<Vec<Rfq>>;

    /// Returns RFQs whose observed status at `now` equals `status`.
    async fn find_by_status(&self, status: RfqStatus, now: Timestamp)
    -> RepositoryResult<Vec<Rfq>>;

    /// Returns RFQs stored as `open` or `quoted` whose window has passed.
    async fn find_due_for_expiry(&self, now: Timestamp) -> RepositoryResult<Vec<Rfq>>;

    /// Counts all RFQs.
    async fn count(&self) -> RepositoryResult<u64>;

    /// Counts RFQs whose observed status at `now` equals `status`.
    async fn count_by_status(&self, status: RfqStatus, now: Timestamp) -> RepositoryResult<u64>;

    /// Counts a buyer's RFQs, optionally narrowed to one observed status.
    async fn count_by_buyer(
        &self,
        buyer_id: &UserId,
        status: Option<RfqStatus>,
        now: Timestamp,
    ) -> RepositoryResult<u64>;
}

/// Repository for quotes.
///
/// Quotes are append-only; they are written through
/// [`NegotiationStore::commit_quote`].
#[async_trait]
pub trait QuoteRepository: Send + Sync + fmt::Debug {
    /// Gets a quote by ID.
    async fn get_quote(&self, id: &QuoteId) -> RepositoryResult<Option<Quote>>;

    /// Returns the quotes of an RFQ ordered by `created_at` ascending.
    async fn find_by_rfq(&self, rfq_id: &RfqId) -> RepositoryResult<Vec<Quote>>;

    /// Returns every quote submitted by a supplier.
    async fn find_by_supplier(&self, supplier_id: &UserId) -> RepositoryResult<Vec<Quote>>;

    /// Returns the supplier's quote on an RFQ, if any.
    async fn find_by_rfq_and_supplier(
        &self,
        rfq_id: &RfqId,
        supplier_id: &UserId,
    ) -> RepositoryResult<Option<Quote>>;

    /// Counts the quotes submitted by a supplier.
    async fn count_by_supplier(&self, supplier_id: &UserId) -> RepositoryResult<u64>;
}

/// Combined store for RFQs and their quotes.
#[async_trait]
pub trait NegotiationStore: RfqRepository + QuoteRepository {
    /// Inserts `quote` and replaces `rfq` as one unit.
    ///
    /// Nothing is written unless the stored RFQ still has
    /// `expected_version` and the supplier has no quote on it yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` if the RFQ changed.
    /// Returns `RepositoryError::Duplicate` if the supplier already quoted.
    /// Returns `RepositoryError::NotFound` if the RFQ does not exist.
    async fn commit_quote(
        &self,
        rfq: &Rfq,
        expected_version: u64,
        quote: &Quote,
    ) -> RepositoryResult<()>;
}
