//! # RFQ Registry
//!
//! Owns RFQ records, their status, and expiration.
//!
//! Every write to an RFQ runs under that RFQ's entry in [`RfqLocks`] and is
//! committed with a version check. Reads that observe an elapsed window
//! persist `expired` before returning.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Principal, Rfq, RfqBuilder};
use crate::domain::services::authorization::{self, Access, Action};
use crate::domain::value_objects::{ProductId, RfqId, RfqStatus, Timestamp, UserId};
use crate::infrastructure::catalog::CatalogStore;
use crate::infrastructure::persistence::{NegotiationStore, QuoteRepository, RfqRepository};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Per-RFQ async mutexes.
///
/// Contention is limited to callers touching the same RFQ. Clones share the
/// same table. An entry lives only while some caller holds or awaits its
/// mutex, so the table never outgrows the set of RFQs being written.
#[derive(Debug, Clone, Default)]
pub struct RfqLocks {
    inner: Arc<DashMap<RfqId, Arc<Mutex<()>>>>,
}

impl RfqLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn lock(&self, id: RfqId) -> RfqLockGuard {
        let mutex = Arc::clone(self.inner.entry(id).or_default().value());
        // Built before waiting so a cancelled waiter still releases its entry.
        let mut lease = RfqLockGuard {
            guard: None,
            mutex,
            table: Arc::clone(&self.inner),
            id,
        };
        lease.guard = Some(Arc::clone(&lease.mutex).lock_owned().await);
        lease
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.inner.len()
    }
}

/// Exclusive access to one RFQ, released on drop.
#[derive(Debug)]
pub struct RfqLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    mutex: Arc<Mutex<()>>,
    table: Arc<DashMap<RfqId, Arc<Mutex<()>>>>,
    id: RfqId,
}

impl Drop for RfqLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Every holder or waiter keeps a clone, so two references means only
        // the table and this guard remain. `remove_if` runs under the shard
        // lock that `lock` clones through.
        self.table.remove_if(&self.id, |_, mutex| {
            Arc::ptr_eq(mutex, &self.mutex) && Arc::strong_count(mutex) == 2
        });
    }
}

/// Registry of RFQ aggregates.
#[derive(Debug, Clone)]
pub struct RfqRegistry {
    store: Arc<dyn NegotiationStore>,
    catalog: Arc<dyn CatalogStore>,
    locks: RfqLocks,
}

impl RfqRegistry {
    /// Creates a registry writing under `locks`.
    ///
    /// Every writer of the same store must share one lock table.
    #[must_use]
    pub fn new(
        store: Arc<dyn NegotiationStore>,
        catalog: Arc<dyn CatalogStore>,
        locks: RfqLocks,
    ) -> Self {
        Self {
            store,
            catalog,
            locks,
        }
    }

    /// Returns the lock table shared with other RFQ writers.
    #[must_use]
    pub fn locks(&self) -> &RfqLocks {
        &self.locks
    }

    /// Creates an RFQ for `buyer_id`.
    ///
    /// A zero-day window yields an RFQ that is already expired.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` if the quantity is not
    /// positive, the window is negative, or the product does not exist.
    pub async fn create(
        &self,
        buyer_id: UserId,
        product_id: ProductId,
        quantity: i64,
        message: Option<String>,
        validity_days: i64,
    ) -> ApplicationResult<Rfq> {
        let quantity = u64::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| ApplicationError::validation("quantity must be positive"))?;

        match self.catalog.resolve_product(&product_id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                return Err(ApplicationError::validation(format!(
                    "product {product_id} does not exist"
                )));
            }
            Err(err) => return Err(err.into()),
        }

        let now = Timestamp::now();
        let mut builder = RfqBuilder::new(buyer_id, product_id, quantity)
            .created_at(now)
            .validity_days(validity_days);
        if let Some(message) = message {
            builder = builder.message(message);
        }
        let mut rfq = builder.try_build()?;
        rfq.refresh_expiry(now);

        self.store.insert(&rfq).await?;
        info!(
            rfq_id = %rfq.id(),
            buyer_id = %buyer_id,
            product_id = %product_id,
            quantity,
            expires_at = %rfq.expires_at(),
            "RFQ created"
        );
        Ok(rfq)
    }

    /// Gets an RFQ, persisting expiry if its window has passed.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the RFQ does not exist.
    pub async fn get(&self, id: RfqId) -> ApplicationResult<Rfq> {
        let rfq = self.load(id).await?;
        if rfq.is_due_for_expiry(Timestamp::now()) {
            let (rfq, _) = self.update_with(id, |_, _| Ok(false)).await?;
            return Ok(rfq);
        }
        debug!(rfq_id = %id, status = %rfq.status(), "RFQ loaded");
        Ok(rfq)
    }

    /// Lists the RFQs visible to `principal`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for(&self, principal: &Principal) -> ApplicationResult<Vec<Rfq>> {
        let now = Timestamp::now();
        let candidates = match authorization::access(principal.role, Action::ListRfqs) {
            Access::Denied => Vec::new(),
            Access::Unrestricted => self.store.find_all().await?,
            Access::OwnRecords => self.store.find_by_buyer(&principal.user_id).await?,
            Access::OpenOrParticipating => {
                let mut visible: HashMap<RfqId, Rfq> = HashMap::new();
                for status in [RfqStatus::Open, RfqStatus::Quoted] {
                    for rfq in self.store.find_by_status(status, now).await? {
                        visible.insert(rfq.id(), rfq);
                    }
                }
                for quote in self.store.find_by_supplier(&principal.user_id).await? {
                    if let Some(rfq) = self.store.get(&quote.rfq_id()).await? {
                        visible.insert(rfq.id(), rfq);
                    }
                }
                visible.into_values().collect()
            }
        };

        let mut rfqs = Vec::with_capacity(candidates.len());
        for rfq in candidates {
            if rfq.is_due_for_expiry(now) {
                let (fresh, _) = self.update_with(rfq.id(), |_, _| Ok(false)).await?;
                rfqs.push(fresh);
            } else {
                rfqs.push(rfq);
            }
        }
        rfqs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        debug!(principal = %principal, count = rfqs.len(), "RFQs listed");
        Ok(rfqs)
    }

    /// Applies a status change along the state machine.
    ///
    /// Requesting the current status, or a terminal status for a terminal
    /// RFQ, succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the RFQ does not exist and
    /// `ApplicationError::State` if the transition is not allowed.
    pub async fn transition(&self, id: RfqId, target: RfqStatus) -> ApplicationResult<Rfq> {
        let (rfq, _) = self
            .update_with(id, |rfq, now| Ok(rfq.apply_transition(target, now)?))
            .await?;
        Ok(rfq)
    }

    /// Expires every RFQ whose window has passed at `now`.
    ///
    /// Returns the number of RFQs transitioned. Failures on individual RFQs
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the due RFQs cannot be listed.
    pub async fn sweep_expired(&self, now: Timestamp) -> ApplicationResult<usize> {
        let due = self.store.find_due_for_expiry(now).await?;
        let mut expired = 0;
        for rfq in due {
            match self.update_at(rfq.id(), now, |_, _| Ok(false)).await {
                Ok((_, true)) => expired += 1,
                Ok((_, false)) => {}
                Err(err) => warn!(rfq_id = %rfq.id(), error = %err, "failed to expire RFQ"),
            }
        }
        if expired > 0 {
            info!(expired, "expired RFQs swept");
        }
        Ok(expired)
    }

    /// Runs `mutate` on the current record under the RFQ's lock.
    ///
    /// Expiry is refreshed before `mutate` runs and is persisted even if
    /// `mutate` fails. Returns the stored record and whether it was written.
    /// A write that loses a version check is a `Conflict`; nothing of
    /// `mutate` is kept.
    pub(crate) async fn update_with<F>(
        &self,
        id: RfqId,
        mutate: F,
    ) -> ApplicationResult<(Rfq, bool)>
    where
        F: FnOnce(&mut Rfq, Timestamp) -> ApplicationResult<bool> + Send,
    {
        self.update_at(id, Timestamp::now(), mutate).await
    }

    async fn update_at<F>(
        &self,
        id: RfqId,
        now: Timestamp,
        mutate: F,
    ) -> ApplicationResult<(Rfq, bool)>
    where
        F: FnOnce(&mut Rfq, Timestamp) -> ApplicationResult<bool> + Send,
    {
        let _guard = self.locks.lock(id).await;
        let mut rfq = self.load(id).await?;
        let expected = rfq.version();
        let previous = rfq.status();

        let expired = rfq.refresh_expiry(now);
        let outcome = mutate(&mut rfq, now);
        let changed = expired || matches!(outcome, Ok(true));

        if changed {
            match self.store.update(&rfq, expected).await {
                Ok(()) => info!(
                    rfq_id = %id,
                    from = %previous,
                    status = %rfq.status(),
                    version = rfq.version(),
                    "RFQ status changed"
                ),
                Err(err) => {
                    if err.is_version_conflict() {
                        warn!(rfq_id = %id, expected, "RFQ changed outside its lock");
                    }
                    return Err(err.into());
                }
            }
        }

        outcome?;
        Ok((rfq, changed))
    }

    async fn load(&self, id: RfqId) -> ApplicationResult<Rfq> {
        self.store
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("RFQ", id.to_string()))
    }
}
