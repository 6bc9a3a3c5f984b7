//! # In-Memory Negotiation Store
//!
//! In-memory implementation of [`NegotiationStore`].
//!
//! RFQs and quotes live behind one `RwLock` so that
//! [`commit_quote`](NegotiationStore::commit_quote) can check the RFQ
//! version and the one-quote-per-supplier rule and write both records
//! under a single write guard.

use crate::domain::entities::{Quote, Rfq};
use crate::domain::value_objects::{QuoteId, RfqId, RfqStatus, Timestamp, UserId};
use crate::infrastructure::persistence::traits::{
    NegotiationStore, QuoteRepository, RepositoryError, RepositoryResult, RfqRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    rfqs: HashMap<RfqId, Rfq>,
    quotes: HashMap<QuoteId, Quote>,
    // Insertion order doubles as the tie-break for equal `created_at`.
    quotes_by_rfq: HashMap<RfqId, Vec<QuoteId>>,
}

impl StoreState {
    fn check_version(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()> {
        let stored = self
            .rfqs
            .get(&rfq.id())
            .ok_or_else(|| RepositoryError::not_found("Rfq", rfq.id().to_string()))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::version_conflict(
                "Rfq",
                rfq.id().to_string(),
                expected_version,
                stored.version(),
            ));
        }
        Ok(())
    }

    fn quotes_of(&self, rfq_id: RfqId) -> impl Iterator<Item = &Quote> {
        self.quotes_by_rfq
            .get(&rfq_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.quotes.get(id))
    }
}

/// In-memory implementation of [`NegotiationStore`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNegotiationStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryNegotiationStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RfqRepository for InMemoryNegotiationStore {
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.rfqs.contains_key(&rfq.id()) {
            return Err(RepositoryError::duplicate("Rfq", rfq.id().to_string()));
        }
        state.rfqs.insert(rfq.id(), rfq.clone());
        Ok(())
    }

    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.check_version(rfq, expected_version)?;
        state.rfqs.insert(rfq.id(), rfq.clone());
        Ok(())
    }

    async fn get(&self, id: &RfqId) -> RepositoryResult<Option<Rfq>> {
        let state = self.state.read().await;
        Ok(state.rfqs.get(id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Rfq>> {
        let state = self.state.read().await;
        Ok(state.rfqs.values().cloned().collect())
    }

    async fn find_by_buyer(&self, buyer_id: &UserId) -> RepositoryResult<Vec<Rfq>> {
        let state = self.state.read().await;
        Ok(state
            .rfqs
            .values()
            .filter(|rfq| rfq.is_owned_by(*buyer_id))
            .cloned()
            .collect())
    }

    async fn find_by_status(
        &self,
        status: RfqStatus,
        now: Timestamp,
    ) -> RepositoryResult<Vec<Rfq>> {
        let state = self.state.read().await;
        Ok(state
            .rfqs
            .values()
            .filter(|rfq| rfq.status_at(now) == status)
            .cloned()
            .collect())
    }

    async fn find_due_for_expiry(&self, now: Timestamp) -> RepositoryResult<Vec<Rfq>> {
        let state = self.state.read().await;
        Ok(state
            .rfqs
            .values()
            .filter(|rfq| rfq.is_due_for_expiry(now))
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        Ok(state.rfqs.len() as u64)
    }

    async fn count_by_status(&self, status: RfqStatus, now: Timestamp) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .rfqs
            .values()
            .filter(|rfq| rfq.status_at(now) == status)
            .count() as u64)
    }

    async fn count_by_buyer(
        &self,
        buyer_id: &UserId,
        status: Option<RfqStatus>,
        now: Timestamp,
    ) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .rfqs
            .values()
            .filter(|rfq| rfq.is_owned_by(*buyer_id))
            .filter(|rfq| status.is_none_or(|s| rfq.status_at(now) == s))
            .count() as u64)
    }
}

#[async_trait]
impl QuoteRepository for InMemoryNegotiationStore {
    async fn get_quote(&self, id: &QuoteId) -> RepositoryResult<Option<Quote>> {
        let state = self.state.read().await;
        Ok(state.quotes.get(id).cloned())
    }

    async fn find_by_rfq(&self, rfq_id: &RfqId) -> RepositoryResult<Vec<Quote>> {
        let state = self.state.read().await;
        let mut quotes: Vec<Quote> = state.quotes_of(*rfq_id).cloned().collect();
        quotes.sort_by_key(Quote::created_at);
        Ok(quotes)
    }

    async fn find_by_supplier(&self, supplier_id: &UserId) -> RepositoryResult<Vec<Quote>> {
        let state = self.state.read().await;
        Ok(state
            .quotes
            .values()
            .filter(|quote| quote.supplier_id() == *supplier_id)
            .cloned()
            .collect())
    }

    async fn find_by_rfq_and_supplier(
        &self,
        rfq_id: &RfqId,
        supplier_id: &UserId,
    ) -> RepositoryResult<Option<Quote>> {
        let state = self.state.read().await;
        Ok(state
            .quotes_of(*rfq_id)
            .find(|quote| quote.supplier_id() == *supplier_id)
            .cloned())
    }

    async fn count_by_supplier(&self, supplier_id: &UserId) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .quotes
            .values()
            .filter(|quote| quote.supplier_id() == *supplier_id)
            .count() as u64)
    }
}

#[async_trait]
impl NegotiationStore for InMemoryNegotiationStore {
    async fn commit_quote(
        &self,
        rfq: &Rfq,
        expected_version: u64,
        quote: &Quote,
    ) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.check_version(rfq, expected_version)?;

        if state
            .quotes_of(rfq.id())
            .any(|existing| existing.supplier_id() == quote.supplier_id())
        {
            return Err(RepositoryError::duplicate(
                "Quote",
                format!("{}/{}", rfq.id(), quote.supplier_id()),
            ));
        }
        if state.quotes.contains_key(&quote.id()) {
            return Err(RepositoryError::duplicate("Quote", quote.id().to_string()));
        }

        state.rfqs.insert(rfq.id(), rfq.clone());
        state.quotes.insert(quote.id(), quote.clone());
        state
            .quotes_by_rfq
            .entry(rfq.id())
            .or_default()
            .push(quote.id());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::RfqBuilder;
    use crate::domain::value_objects::{Price, ProductId};
    use rust_decimal::Decimal;

    fn create_test_rfq() -> Rfq {
        RfqBuilder::new(UserId::new_v4(), ProductId::new_v4(), 10)
            .try_build()
            .unwrap()
    }

    fn create_test_quote(rfq: &Rfq, supplier_id: UserId, now: Timestamp) -> Quote {
        Quote::new(
            rfq,
            supplier_id,
            Price::new(Decimal::new(5, 0)).unwrap(),
            "3 days",
            None,
            now,
        )
        .unwrap()
    }

    /// Mirrors what the ledger does: record the quote, then commit both.
    async fn submit(store: &InMemoryNegotiationStore, rfq_id: RfqId, supplier: UserId) -> Quote {
        let now = Timestamp::now();
        let mut rfq = store.get(&rfq_id).await.unwrap().unwrap();
        let expected = rfq.version();
        let quote = create_test_quote(&rfq, supplier, now);
        rfq.record_quote(now).unwrap();
        store.commit_quote(&rfq, expected, &quote).await.unwrap();
        quote
    }

    mod rfqs {
        use super::*;

        #[tokio::test]
        async fn new_store_is_empty() {
            let store = InMemoryNegotiationStore::new();
            assert_eq!(store.count().await.unwrap(), 0);
            assert!(store.find_all().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn insert_and_get() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();

            assert_eq!(store.get(&rfq.id()).await.unwrap(), Some(rfq));
            assert_eq!(store.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn duplicate_insert_fails() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();

            let err = store.insert(&rfq).await.unwrap_err();
            assert!(err.is_duplicate());
        }

        #[tokio::test]
        async fn stale_update_conflicts() {
            let store = InMemoryNegotiationStore::new();
            let now = Timestamp::now();
            let mut rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();

            rfq.apply_transition(RfqStatus::Quoted, now).unwrap();
            store.update(&rfq, 1).await.unwrap();

            let err = store.update(&rfq, 1).await.unwrap_err();
            assert!(err.is_version_conflict());
        }

        #[tokio::test]
        async fn update_missing_fails() {
            let store = InMemoryNegotiationStore::new();
            let err = store.update(&create_test_rfq(), 1).await.unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn counts_apply_expiry_predicate() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            let buyer = rfq.buyer_id();
            store.insert(&rfq).await.unwrap();
            let now = Timestamp::now();
            let later = rfq.expires_at().add_secs(1);

            assert_eq!(store.count_by_status(RfqStatus::Open, now).await.unwrap(), 1);
            assert_eq!(store.count_by_status(RfqStatus::Open, later).await.unwrap(), 0);
            assert_eq!(
                store.count_by_status(RfqStatus::Expired, later).await.unwrap(),
                1
            );
            assert_eq!(store.find_due_for_expiry(later).await.unwrap().len(), 1);
            assert_eq!(store.count_by_buyer(&buyer, None, now).await.unwrap(), 1);
            assert_eq!(
                store
                    .count_by_buyer(&buyer, Some(RfqStatus::Closed), now)
                    .await
                    .unwrap(),
                0
            );
        }
    }

    mod quotes {
        use super::*;

        #[tokio::test]
        async fn commit_writes_quote_and_rfq() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();
            let supplier = UserId::new_v4();

            let quote = submit(&store, rfq.id(), supplier).await;

            let stored = store.get(&rfq.id()).await.unwrap().unwrap();
            assert_eq!(stored.status(), RfqStatus::Quoted);
            assert_eq!(store.get_quote(&quote.id()).await.unwrap(), Some(quote));
            assert_eq!(store.count_by_supplier(&supplier).await.unwrap(), 1);
            assert!(
                store
                    .find_by_rfq_and_supplier(&rfq.id(), &supplier)
                    .await
                    .unwrap()
                    .is_some()
            );
        }

        #[tokio::test]
        async fn second_quote_from_supplier_is_duplicate() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();
            let supplier = UserId::new_v4();
            submit(&store, rfq.id(), supplier).await;

            let current = store.get(&rfq.id()).await.unwrap().unwrap();
            let quote = create_test_quote(&current, supplier, Timestamp::now());
            let err = store
                .commit_quote(&current, current.version(), &quote)
                .await
                .unwrap_err();

            assert!(err.is_duplicate());
            assert_eq!(store.find_by_rfq(&rfq.id()).await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn stale_commit_writes_nothing() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();
            submit(&store, rfq.id(), UserId::new_v4()).await;

            let quote = create_test_quote(&rfq, UserId::new_v4(), Timestamp::now());
            let err = store.commit_quote(&rfq, 1, &quote).await.unwrap_err();

            assert!(err.is_version_conflict());
            assert!(store.get_quote(&quote.id()).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn quotes_listed_oldest_first() {
            let store = InMemoryNegotiationStore::new();
            let rfq = create_test_rfq();
            store.insert(&rfq).await.unwrap();

            let first = submit(&store, rfq.id(), UserId::new_v4()).await;
            let second = submit(&store, rfq.id(), UserId::new_v4()).await;

            let ids: Vec<_> = store
                .find_by_rfq(&rfq.id())
                .await
                .unwrap()
                .iter()
                .map(Quote::id)
                .collect();
            assert_eq!(ids, vec![first.id(), second.id()]);
        }
    }
}
