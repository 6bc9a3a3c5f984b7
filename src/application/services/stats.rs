//! # Stats Aggregator
//!
//! Role-scoped dashboard counters, recomputed on every call.
//!
//! Counters are computed independently. A failing collaborator zeroes only
//! its own counter, which is then listed in [`DashboardStats::degraded`].

use crate::domain::entities::Principal;
use crate::domain::value_objects::{Role, RfqStatus, Timestamp};
use crate::infrastructure::catalog::CatalogStore;
use crate::infrastructure::identity::UserDirectory;
use crate::infrastructure::persistence::{NegotiationStore, QuoteRepository, RfqRepository};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters shown on a user's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Role the counters were computed for.
    pub role: Role,
    /// Counter name to value.
    pub counters: BTreeMap<String, u64>,
    /// Counters that could not be computed and read as zero.
    pub degraded: Vec<String>,
}

impl DashboardStats {
    fn new(role: Role) -> Self {
        Self {
            role,
            counters: BTreeMap::new(),
            degraded: Vec::new(),
        }
    }

    /// Returns a counter, if it was reported.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    /// Returns true if any counter failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    fn settle<E: fmt::Display>(&mut self, name: &str, result: Result<u64, E>) {
        let value = result.unwrap_or_else(|err| {
            warn!(counter = name, role = %self.role, error = %err, "stats counter degraded");
            self.degraded.push(name.to_string());
            0
        });
        self.counters.insert(name.to_string(), value);
    }
}

/// Read-only aggregator behind the dashboard.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    store: Arc<dyn NegotiationStore>,
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserDirectory>,
}

impl StatsAggregator {
    /// Creates an aggregator over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn NegotiationStore>,
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            catalog,
            users,
        }
    }

    /// Computes the counters for `principal`'s role.
    ///
    /// - admin: `total_users`, `total_products`, `total_orders`, `total_rfqs`
    /// - supplier: `my_products`, `my_orders`, `pending_rfqs`
    /// - buyer: `my_rfqs`, `my_orders`
    ///
    /// Never fails; see [`DashboardStats::degraded`].
    pub async fn collect(&self, principal: &Principal) -> DashboardStats {
        let now = Timestamp::now();
        let mut stats = DashboardStats::new(principal.role);

        match principal.role {
            Role::Admin => {
                let (users, products, orders, rfqs) = futures::join!(
                    self.users.count(),
                    self.catalog.count_products(),
                    self.store.count_by_status(RfqStatus::Closed, now),
                    self.store.count(),
                );
                stats.settle("total_users", users);
                stats.settle("total_products", products);
                stats.settle("total_orders", orders);
                stats.settle("total_rfqs", rfqs);
            }
            Role::Supplier => {
                let (products, orders, pending) = futures::join!(
                    self.catalog.count_products_by_supplier(&principal.user_id),
                    self.store.count_by_supplier(&principal.user_id),
                    self.store.count_by_status(RfqStatus::Open, now),
                );
                stats.settle("my_products", products);
                stats.settle("my_orders", orders);
                stats.settle("pending_rfqs", pending);
            }
            Role::Buyer => {
                let (rfqs, orders) = futures::join!(
                    self.store.count_by_buyer(&principal.user_id, None, now),
                    self.store
                        .count_by_buyer(&principal.user_id, Some(RfqStatus::Closed), now),
                );
                stats.settle("my_rfqs", rfqs);
                stats.settle("my_orders", orders);
            }
        }

        debug!(principal = %principal, degraded = stats.is_degraded(), "stats collected");
        stats
    }
}
