//! # Quote Ledger
//!
//! Owns supplier quotes.
//!
//! A submission is checked twice: once on entry and again under the RFQ's
//! lock right before the commit, so a quote never lands on an RFQ that was
//! closed or expired while the request was in flight. The quote insert and
//! the `open → quoted` transition are written by one
//! [`NegotiationStore::commit_quote`] call.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::rfq_registry::RfqLocks;
use crate::domain::entities::{Principal, Quote, Rfq};
use crate::domain::services::authorization::{self, Action};
use crate::domain::value_objects::{Price, QuoteId, RfqId, Timestamp};
use crate::infrastructure::persistence::{NegotiationStore, QuoteRepository, RfqRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// A recorded quote together with the RFQ as it stood after the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSubmission {
    /// The stored quote.
    pub quote: Quote,
    /// The RFQ after the quote was recorded.
    pub rfq: Rfq,
}

/// Ledger of supplier quotes.
#[derive(Debug, Clone)]
pub struct QuoteLedger {
    store: Arc<dyn NegotiationStore>,
    locks: RfqLocks,
}

impl QuoteLedger {
    /// Creates a ledger writing under `locks`.
    ///
    /// Pass the registry's lock table so that quote commits and status
    /// changes on the same RFQ are serialized.
    #[must_use]
    pub fn new(store: Arc<dyn NegotiationStore>, locks: RfqLocks) -> Self {
        Self { store, locks }
    }

    /// Submits a quote from `supplier` against `rfq_id`.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the principal is not a supplier
    /// - `Validation` if the price is not positive or delivery time is blank
    /// - `NotFound` if the RFQ does not exist
    /// - `State` if the RFQ is closed or expired at commit time
    /// - `Conflict` if the supplier already quoted this RFQ
    pub async fn submit(
        &self,
        supplier: &Principal,
        rfq_id: RfqId,
        price_per_unit: Decimal,
        delivery_time: &str,
        message: Option<String>,
    ) -> ApplicationResult<QuoteSubmission> {
        authorization::require(supplier.role, Action::SubmitQuote)?;
        let price = Price::new(price_per_unit)?;
        if delivery_time.trim().is_empty() {
            return Err(ApplicationError::validation("delivery_time must not be blank"));
        }

        // Unknown ids never reach the lock table.
        self.load(rfq_id).await?;

        let _guard = self.locks.lock(rfq_id).await;
        let mut rfq = self.load(rfq_id).await?;
        let expected = rfq.version();
        let now = Timestamp::now();

        if rfq.refresh_expiry(now) {
            self.store.update(&rfq, expected).await?;
            info!(rfq_id = %rfq_id, status = %rfq.status(), "RFQ status changed");
        }
        rfq.ensure_accepts_quotes(now)?;

        if self
            .store
            .find_by_rfq_and_supplier(&rfq_id, &supplier.user_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::conflict(format!(
                "supplier {} already quoted rfq {rfq_id}",
                supplier.user_id
            )));
        }

        let quote = Quote::new(&rfq, supplier.user_id, price, delivery_time, message, now)?;
        let previous = rfq.status();
        rfq.record_quote(now)?;
        self.store.commit_quote(&rfq, expected, &quote).await?;

        info!(
            rfq_id = %rfq_id,
            quote_id = %quote.id(),
            supplier_id = %supplier.user_id,
            price_per_unit = %quote.price_per_unit(),
            from = %previous,
            status = %rfq.status(),
            "quote submitted"
        );
        Ok(QuoteSubmission { quote, rfq })
    }

    /// Lists the quotes of an RFQ, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for_rfq(&self, rfq_id: RfqId) -> ApplicationResult<Vec<Quote>> {
        let quotes = self.store.find_by_rfq(&rfq_id).await?;
        debug!(rfq_id = %rfq_id, count = quotes.len(), "quotes listed");
        Ok(quotes)
    }

    async fn load(&self, rfq_id: RfqId) -> ApplicationResult<Rfq> {
        self.store
            .get(&rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("RFQ", rfq_id.to_string()))
    }

    /// Gets a quote.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the quote does not exist.
    pub async fn get(&self, id: QuoteId) -> ApplicationResult<Quote> {
        self.store
            .get_quote(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Quote", id.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::RfqBuilder;
    use crate::domain::value_objects::{ProductId, Role, RfqStatus, UserId};
    use crate::infrastructure::persistence::InMemoryNegotiationStore;

    struct Fixture {
        ledger: QuoteLedger,
        store: InMemoryNegotiationStore,
    }

    fn setup() -> Fixture {
        let store = InMemoryNegotiationStore::new();
        let ledger = QuoteLedger::new(Arc::new(store.clone()), RfqLocks::new());
        Fixture { ledger, store }
    }

    async fn insert_rfq(store: &InMemoryNegotiationStore, validity_days: i64) -> Rfq {
        let rfq = RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 10)
            .validity_days(validity_days)
            .try_build()
            .unwrap();
        store.insert(&rfq).await.unwrap();
        rfq
    }

    fn supplier() -> Principal {
        Principal::new(UserId::new_v4(), Role::Supplier, "ChemCorp", "John")
    }

    fn five() -> Decimal {
        Decimal::new(5, 0)
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn first_quote_moves_rfq_to_quoted() {
            let fx = setup();
            let rfq = insert_rfq(&fx.store, 7).await;

            let submission = fx
                .ledger
                .submit(&supplier(), rfq.id(), five(), "3 days", None)
                .await
                .unwrap();

            assert_eq!(submission.rfq.status(), RfqStatus::Quoted);
            assert_eq!(submission.quote.total_price().value(), Decimal::new(50, 0));
            let stored = fx.store.get(&rfq.id()).await.unwrap().unwrap();
            assert_eq!(stored, submission.rfq);
        }

        #[tokio::test]
        async fn second_quote_from_same_supplier_conflicts() {
            let fx = setup();
            let rfq = insert_rfq(&fx.store, 7).await;
            let s1 = supplier();

            fx.ledger
                .submit(&s1, rfq.id(), five(), "3 days", None)
                .await
                .unwrap();
            let err = fx
                .ledger
                .submit(&s1, rfq.id(), five(), "2 days", None)
                .await
                .unwrap_err();
            assert!(err.is_conflict());

            let s2 = supplier();
            let submission = fx
                .ledger
                .submit(&s2, rfq.id(), Decimal::new(45, 1), "5 days", None)
                .await
                .unwrap();
            assert_eq!(submission.rfq.status(), RfqStatus::Quoted);
            assert_eq!(fx.ledger.list_for_rfq(rfq.id()).await.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn non_supplier_is_refused() {
            let fx = setup();
            let rfq = insert_rfq(&fx.store, 7).await;
            let buyer = Principal::new(UserId::new_v4(), Role::Buyer, "Acme", "Jane");

            let err = fx
                .ledger
                .submit(&buyer, rfq.id(), five(), "3 days", None)
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
        }

        #[tokio::test]
        async fn invalid_input_is_refused() {
            let fx = setup();
            let rfq = insert_rfq(&fx.store, 7).await;

            let err = fx
                .ledger
                .submit(&supplier(), rfq.id(), Decimal::ZERO, "3 days", None)
                .await
                .unwrap_err();
            assert!(err.is_validation());

            let err = fx
                .ledger
                .submit(&supplier(), rfq.id(), five(), "   ", None)
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }

        #[tokio::test]
        async fn missing_rfq_is_not_found() {
            let fx = setup();
            let err = fx
                .ledger
                .submit(&supplier(), RfqId::new_v4(), five(), "3 days", None)
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn unknown_rfqs_leave_no_lock_entries() {
            let fx = setup();
            let s1 = supplier();
            for _ in 0..1_000 {
                let err = fx
                    .ledger
                    .submit(&s1, RfqId::new_v4(), five(), "3 days", None)
                    .await
                    .unwrap_err();
                assert!(err.is_not_found());
            }
            assert_eq!(fx.ledger.locks.tracked(), 0);

            let rfq = insert_rfq(&fx.store, 7).await;
            fx.ledger
                .submit(&s1, rfq.id(), five(), "3 days", None)
                .await
                .unwrap();
            assert_eq!(fx.ledger.locks.tracked(), 0);
        }

        #[tokio::test]
        async fn expired_rfq_is_state_error_and_persisted() {
            let fx = setup();
            let rfq = insert_rfq(&fx.store, 0).await;

            let err = fx
                .ledger
                .submit(&supplier(), rfq.id(), five(), "3 days", None)
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(RfqStatus::Expired));

            let stored = fx.store.get(&rfq.id()).await.unwrap().unwrap();
            assert_eq!(stored.status(), RfqStatus::Expired);
            assert!(fx.ledger.list_for_rfq(rfq.id()).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn get_returns_stored_quote() {
        let fx = setup();
        let rfq = insert_rfq(&fx.store, 7).await;
        let submission = fx
            .ledger
            .submit(&supplier(), rfq.id(), five(), "3 days", None)
            .await
            .unwrap();

        let quote = fx.ledger.get(submission.quote.id()).await.unwrap();
        assert_eq!(quote, submission.quote);
        assert!(
            fx.ledger
                .get(QuoteId::new_v4())
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
