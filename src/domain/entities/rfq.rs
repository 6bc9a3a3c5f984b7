//! # RFQ Aggregate Root
//!
//! A buyer's request for pricing on a product and quantity.
//!
//! This module provides the [`Rfq`] aggregate root, which owns the RFQ
//! status, its validity window and the accepted quote.
//!
//! # State Machine
//!
//! ```text
//! Open → Quoted
//!   ↓      ↓
//!   └──────┴→ Closed / Expired
//! ```
//!
//! Expiration is a predicate over `expires_at`: once the window has passed
//! an `Open` or `Quoted` RFQ reports [`RfqStatus::Expired`] from
//! [`Rfq::status_at`], and [`Rfq::refresh_expiry`] makes it stick.
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::domain::entities::RfqBuilder;
//! use b2b_rfq::domain::value_objects::{ProductId, RfqStatus, Timestamp, UserId};
//!
//! let now = Timestamp::now();
//! let rfq = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 10)
//!     .created_at(now)
//!     .validity_days(7)
//!     .try_build()
//!     .unwrap();
//!
//! assert_eq!(rfq.status_at(now), RfqStatus::Open);
//! ```

use crate::domain::entities::normalize_note;
use crate::domain::entities::quote::Quote;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{ProductId, QuoteId, RfqId, RfqStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default validity window in days.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;

/// RFQ (Request-for-Quote) aggregate root.
///
/// # Invariants
///
/// - `quantity > 0`
/// - `expires_at >= created_at`
/// - Status only moves along the state machine; `Closed` and `Expired`
///   are terminal
/// - `accepted_quote_id` is set exactly when the status is `Closed` through
///   quote acceptance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rfq {
    /// Unique identifier for this RFQ.
    id: RfqId,
    /// The buyer who raised the request.
    buyer_id: UserId,
    /// The product being priced.
    product_id: ProductId,
    /// Requested quantity.
    quantity: u64,
    /// Free-form note from the buyer.
    message: Option<String>,
    /// Stored lifecycle status.
    status: RfqStatus,
    /// The quote that closed this RFQ.
    accepted_quote_id: Option<QuoteId>,
    /// Version for optimistic locking.
    version: u64,
    /// When this RFQ was created.
    created_at: Timestamp,
    /// When this RFQ stops accepting quotes.
    expires_at: Timestamp,
    /// When this RFQ was last updated.
    updated_at: Timestamp,
}

impl Rfq {
    /// Creates a new open RFQ with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if quantity is zero.
    /// Returns `DomainError::ValidationError` if `expires_at` precedes
    /// `created_at`.
    pub fn new(
        buyer_id: UserId,
        product_id: ProductId,
        quantity: u64,
        message: Option<String>,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "quantity must be positive".to_string(),
            ));
        }
        if expires_at.is_before(&created_at) {
            return Err(DomainError::ValidationError(
                "expires_at must not precede created_at".to_string(),
            ));
        }

        Ok(Self {
            id: RfqId::new_v4(),
            buyer_id,
            product_id,
            quantity,
            message: normalize_note(message),
            status: RfqStatus::Open,
            accepted_quote_id: None,
            version: 1,
            created_at,
            expires_at,
            updated_at: created_at,
        })
    }

    /// Creates an RFQ with a specific ID (for reconstruction from storage).
    ///
    /// Bypasses validation; only use with trusted storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: RfqId,
        buyer_id: UserId,
        product_id: ProductId,
        quantity: u64,
        message: Option<String>,
        status: RfqStatus,
        accepted_quote_id: Option<QuoteId>,
        version: u64,
        created_at: Timestamp,
        expires_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            buyer_id,
            product_id,
            quantity,
            message,
            status,
            accepted_quote_id,
            version,
            created_at,
            expires_at,
            updated_at,
        }
    }

    /// Returns a builder for constructing an RFQ.
    #[must_use]
    pub fn builder(buyer_id: UserId, product_id: ProductId, quantity: u64) -> RfqBuilder {
        RfqBuilder::new(buyer_id, product_id, quantity)
    }

    fn transition_to(&mut self, target: RfqStatus, now: Timestamp) -> DomainResult<bool> {
        if self.status == target || (self.status.is_terminal() && target.is_terminal()) {
            return Ok(false);
        }
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        self.version = self.version.saturating_add(1);
        Ok(true)
    }

    // ========== Accessors ==========

    /// Returns the RFQ ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> RfqId {
        self.id
    }

    /// Returns the requesting buyer.
    #[inline]
    #[must_use]
    pub fn buyer_id(&self) -> UserId {
        self.buyer_id
    }

    /// Returns the product being priced.
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns the buyer's note.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the stored status, without applying the expiry predicate.
    ///
    /// Prefer [`status_at`](Self::status_at) when reporting to callers.
    #[inline]
    #[must_use]
    pub fn status(&self) -> RfqStatus {
        self.status
    }

    /// Returns the accepted quote, if the RFQ was closed by acceptance.
    #[inline]
    #[must_use]
    pub fn accepted_quote_id(&self) -> Option<QuoteId> {
        self.accepted_quote_id
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when this RFQ was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this RFQ expires.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns when this RFQ was last updated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== State Helpers ==========

    /// Returns true if `user_id` raised this RFQ.
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.buyer_id == user_id
    }

    /// Returns true if the window has passed but the stored status is still
    /// `Open` or `Quoted`.
    #[must_use]
    pub fn is_due_for_expiry(&self, now: Timestamp) -> bool {
        self.status.accepts_quotes() && self.expires_at.is_reached_at(now)
    }

    /// Returns the status as observed at `now`.
    ///
    /// `Closed` is sticky; any other non-terminal status reads as `Expired`
    /// once the window has passed.
    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> RfqStatus {
        if self.is_due_for_expiry(now) {
            RfqStatus::Expired
        } else {
            self.status
        }
    }

    /// Checks that suppliers may still quote at `now`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` carrying the observed status if
    /// the RFQ is closed or its window has passed.
    pub fn ensure_accepts_quotes(&self, now: Timestamp) -> DomainResult<()> {
        let status = self.status_at(now);
        if !status.accepts_quotes() {
            return Err(DomainError::InvalidState {
                status,
                reason: "rfq is not open for quotes".to_string(),
            });
        }
        Ok(())
    }

    // ========== State Transitions ==========

    /// Applies a status change along the state machine.
    ///
    /// Returns `Ok(false)` without side effects when the RFQ is already in
    /// `target`, or when both the current and target statuses are terminal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` for any other move the
    /// state machine does not allow.
    pub fn apply_transition(&mut self, target: RfqStatus, now: Timestamp) -> DomainResult<bool> {
        self.transition_to(target, now)
    }

    /// Persists the expiry predicate into the stored status.
    ///
    /// Returns true if the status changed.
    pub fn refresh_expiry(&mut self, now: Timestamp) -> bool {
        if !self.is_due_for_expiry(now) {
            return false;
        }
        matches!(self.transition_to(RfqStatus::Expired, now), Ok(true))
    }

    /// Records that a quote was received.
    ///
    /// Transitions: Open → Quoted (on first quote); Quoted stays Quoted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the RFQ no longer accepts
    /// quotes at `now`.
    pub fn record_quote(&mut self, now: Timestamp) -> DomainResult<bool> {
        self.ensure_accepts_quotes(now)?;
        self.transition_to(RfqStatus::Quoted, now)
    }

    /// Closes the RFQ by accepting one of its quotes.
    ///
    /// Transitions: Open/Quoted → Closed. Accepting the quote that already
    /// closed the RFQ is a no-op returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the quote belongs to another
    /// RFQ. Returns `DomainError::InvalidState` if the RFQ expired or was
    /// closed by a different quote.
    pub fn accept_quote(&mut self, quote: &Quote, now: Timestamp) -> DomainResult<bool> {
        if quote.rfq_id() != self.id {
            return Err(DomainError::ValidationError(
                "quote does not belong to this RFQ".to_string(),
            ));
        }

        match self.status_at(now) {
            RfqStatus::Closed if self.accepted_quote_id == Some(quote.id()) => Ok(false),
            RfqStatus::Closed => Err(DomainError::InvalidState {
                status: RfqStatus::Closed,
                reason: "another quote was already accepted".to_string(),
            }),
            RfqStatus::Expired => Err(DomainError::InvalidState {
                status: RfqStatus::Expired,
                reason: "rfq expired before a quote was accepted".to_string(),
            }),
            RfqStatus::Open | RfqStatus::Quoted => {
                self.transition_to(RfqStatus::Closed, now)?;
                self.accepted_quote_id = Some(quote.id());
                Ok(true)
            }
        }
    }

    /// Expires the RFQ.
    ///
    /// Transitions: Open/Quoted → Expired. A closed RFQ is left untouched.
    ///
    /// # Errors
    ///
    /// Never fails for valid stored states; the result mirrors
    /// [`apply_transition`](Self::apply_transition).
    pub fn expire(&mut self, now: Timestamp) -> DomainResult<bool> {
        self.transition_to(RfqStatus::Expired, now)
    }
}

impl fmt::Display for Rfq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RFQ({} {} x {} [{}])",
            self.id, self.quantity, self.product_id, self.status
        )
    }
}

/// Builder for constructing [`Rfq`] instances.
#[derive(Debug, Clone)]
pub struct RfqBuilder {
    buyer_id: UserId,
    product_id: ProductId,
    quantity: u64,
    message: Option<String>,
    created_at: Option<Timestamp>,
    validity_days: i64,
}

impl RfqBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(buyer_id: UserId, product_id: ProductId, quantity: u64) -> Self {
        Self {
            buyer_id,
            product_id,
            quantity,
            message: None,
            created_at: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }

    /// Sets the buyer's note.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the creation time (defaults to now).
    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the validity window in days.
    #[must_use]
    pub fn validity_days(mut self, days: i64) -> Self {
        self.validity_days = days;
        self
    }

    /// Builds the RFQ with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the validity window is
    /// negative or overflows, and any error from [`Rfq::new`].
    pub fn try_build(self) -> DomainResult<Rfq> {
        if self.validity_days < 0 {
            return Err(DomainError::ValidationError(
                "validity window must not be negative".to_string(),
            ));
        }
        let created_at = self.created_at.unwrap_or_else(Timestamp::now);
        let expires_at = created_at
            .checked_add_days(self.validity_days)
            .ok_or_else(|| {
                DomainError::ValidationError("validity window is out of range".to_string())
            })?;
        Rfq::new(
            self.buyer_id,
            self.product_id,
            self.quantity,
            self.message,
            created_at,
            expires_at,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Price;
    use rust_decimal::Decimal;

    fn create_test_rfq(now: Timestamp) -> Rfq {
        RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 10)
            .created_at(now)
            .try_build()
            .unwrap()
    }

    fn create_test_quote(rfq: &Rfq, now: Timestamp) -> Quote {
        Quote::new(
            rfq,
            UserId::new_v4(),
            Price::new(Decimal::new(5, 0)).unwrap(),
            "3 days",
            None,
            now,
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn builder_uses_default_window() {
            let now = Timestamp::from_secs(1_704_067_200).unwrap();
            let rfq = create_test_rfq(now);

            assert_eq!(rfq.status(), RfqStatus::Open);
            assert_eq!(rfq.version(), 1);
            assert_eq!(
                rfq.expires_at().timestamp_secs() - rfq.created_at().timestamp_secs(),
                DEFAULT_VALIDITY_DAYS * 86_400
            );
        }

        #[test]
        fn zero_quantity_is_rejected() {
            let result = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 0).try_build();
            assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
        }

        #[test]
        fn negative_window_is_rejected() {
            let result = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 1)
                .validity_days(-1)
                .try_build();
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }

        #[test]
        fn blank_message_is_dropped() {
            let rfq = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 1)
                .message("   ")
                .try_build()
                .unwrap();
            assert_eq!(rfq.message(), None);
        }
    }

    mod expiry {
        use super::*;

        #[test]
        fn zero_day_window_is_expired_immediately() {
            let now = Timestamp::now();
            let mut rfq = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 1)
                .created_at(now)
                .validity_days(0)
                .try_build()
                .unwrap();

            assert_eq!(rfq.status_at(now), RfqStatus::Expired);
            assert!(rfq.refresh_expiry(now));
            assert_eq!(rfq.status(), RfqStatus::Expired);
            assert!(!rfq.refresh_expiry(now));
        }

        #[test]
        fn quoted_rfq_expires_too() {
            let now = Timestamp::from_secs(1_704_067_200).unwrap();
            let mut rfq = create_test_rfq(now);
            rfq.record_quote(now).unwrap();

            let later = rfq.expires_at().add_secs(1);
            assert_eq!(rfq.status_at(later), RfqStatus::Expired);
        }

        #[test]
        fn closed_is_sticky_past_expiry() {
            let now = Timestamp::from_secs(1_704_067_200).unwrap();
            let mut rfq = create_test_rfq(now);
            let quote = create_test_quote(&rfq, now);
            rfq.accept_quote(&quote, now).unwrap();

            let later = rfq.expires_at().add_secs(1);
            assert_eq!(rfq.status_at(later), RfqStatus::Closed);
            assert!(!rfq.refresh_expiry(later));
            assert!(!rfq.expire(later).unwrap());
            assert_eq!(rfq.status(), RfqStatus::Closed);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn first_quote_moves_to_quoted() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);

            assert!(rfq.record_quote(now).unwrap());
            assert_eq!(rfq.status(), RfqStatus::Quoted);
            assert_eq!(rfq.version(), 2);

            assert!(!rfq.record_quote(now).unwrap());
            assert_eq!(rfq.version(), 2);
        }

        #[test]
        fn quoting_expired_rfq_reports_expired() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            let later = rfq.expires_at();

            let err = rfq.record_quote(later).unwrap_err();
            assert_eq!(err.status(), Some(RfqStatus::Expired));
        }

        #[test]
        fn reapplying_current_status_is_noop() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            rfq.apply_transition(RfqStatus::Quoted, now).unwrap();

            assert!(!rfq.apply_transition(RfqStatus::Quoted, now).unwrap());
            assert_eq!(rfq.version(), 2);
        }

        #[test]
        fn cannot_reopen() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            rfq.apply_transition(RfqStatus::Quoted, now).unwrap();

            let result = rfq.apply_transition(RfqStatus::Open, now);
            assert!(matches!(
                result,
                Err(DomainError::InvalidStateTransition {
                    from: RfqStatus::Quoted,
                    to: RfqStatus::Open
                })
            ));
        }

        #[test]
        fn accept_closes_and_records_quote() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            let quote = create_test_quote(&rfq, now);
            rfq.record_quote(now).unwrap();

            assert!(rfq.accept_quote(&quote, now).unwrap());
            assert_eq!(rfq.status(), RfqStatus::Closed);
            assert_eq!(rfq.accepted_quote_id(), Some(quote.id()));

            assert!(!rfq.accept_quote(&quote, now).unwrap());
        }

        #[test]
        fn accepting_second_quote_fails() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            let first = create_test_quote(&rfq, now);
            let second = create_test_quote(&rfq, now);
            rfq.accept_quote(&first, now).unwrap();

            let err = rfq.accept_quote(&second, now).unwrap_err();
            assert_eq!(err.status(), Some(RfqStatus::Closed));
        }

        #[test]
        fn accepting_foreign_quote_fails() {
            let now = Timestamp::now();
            let mut rfq = create_test_rfq(now);
            let other = create_test_rfq(now);
            let quote = create_test_quote(&other, now);

            assert!(matches!(
                rfq.accept_quote(&quote, now),
                Err(DomainError::ValidationError(_))
            ));
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn rank(status: RfqStatus) -> u8 {
            match status {
                RfqStatus::Open => 0,
                RfqStatus::Quoted => 1,
                RfqStatus::Closed | RfqStatus::Expired => 2,
            }
        }

        proptest! {
            #[test]
            fn transitions_are_monotonic(targets in prop::collection::vec(0usize..4, 0..16)) {
                let now = Timestamp::now();
                let mut rfq = create_test_rfq(now);

                for index in targets {
                    let before = rfq.status();
                    let _ = rfq.apply_transition(RfqStatus::ALL[index], now);
                    let after = rfq.status();

                    prop_assert!(rank(after) >= rank(before));
                    if before.is_terminal() {
                        prop_assert_eq!(after, before);
                    }
                }
            }
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn status_serializes_lowercase() {
            let rfq = create_test_rfq(Timestamp::now());
            let json = serde_json::to_value(&rfq).unwrap();
            assert_eq!(json["status"], "open");
        }
    }
}
