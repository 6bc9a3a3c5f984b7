//! # Negotiation Coordinator
//!
//! Command surface of the negotiation lifecycle.
//!
//! Each command consults the authorization table before reading any state,
//! then delegates to the [`RfqRegistry`], [`QuoteLedger`] or
//! [`StatsAggregator`]. RFQs a caller may not see are reported as missing.
//!
//! # Examples
//!
//! ```ignore
//! use b2b_rfq::application::commands::CreateRfq;
//! use b2b_rfq::application::services::NegotiationCoordinator;
//!
//! let coordinator = NegotiationCoordinator::new(store, catalog, users, Default::default());
//! let rfq = coordinator
//!     .create_rfq(&buyer, CreateRfq { product_id, quantity: 10, message: None, validity_days: None })
//!     .await?;
//! ```

use crate::application::commands::{CreateRfq, SubmitQuote};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::quote_ledger::{QuoteLedger, QuoteSubmission};
use crate::application::services::rfq_registry::{RfqLocks, RfqRegistry};
use crate::application::services::stats::{DashboardStats, StatsAggregator};
use crate::domain::entities::{DEFAULT_VALIDITY_DAYS, Principal, Quote, Rfq};
use crate::domain::services::authorization::{self, Access, Action};
use crate::domain::value_objects::{QuoteId, RfqId, Timestamp};
use crate::infrastructure::catalog::CatalogStore;
use crate::infrastructure::identity::UserDirectory;
use crate::infrastructure::persistence::NegotiationStore;
use std::sync::Arc;
use tracing::info;

/// Tunables of the negotiation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationConfig {
    /// Validity window applied when a command does not name one.
    pub default_validity_days: i64,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            default_validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

/// Entry point for every negotiation command.
#[derive(Debug, Clone)]
pub struct NegotiationCoordinator {
    registry: RfqRegistry,
    ledger: QuoteLedger,
    stats: StatsAggregator,
    config: NegotiationConfig,
}

impl NegotiationCoordinator {
    /// Wires the registry, ledger and stats over shared collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn NegotiationStore>,
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserDirectory>,
        config: NegotiationConfig,
    ) -> Self {
        let locks = RfqLocks::new();
        let registry = RfqRegistry::new(Arc::clone(&store), Arc::clone(&catalog), locks.clone());
        let ledger = QuoteLedger::new(Arc::clone(&store), locks);
        let stats = StatsAggregator::new(store, catalog, users);
        Self {
            registry,
            ledger,
            stats,
            config,
        }
    }

    /// Returns the lock table guarding writes to this coordinator's RFQs.
    ///
    /// Any other writer over the same store must be built with it.
    #[must_use]
    pub fn locks(&self) -> &RfqLocks {
        self.registry.locks()
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Raises an RFQ on behalf of a buyer.
    ///
    /// # Errors
    ///
    /// `Authorization` for non-buyers; `Validation` for a bad quantity,
    /// window or product.
    pub async fn create_rfq(&self, principal: &Principal, cmd: CreateRfq) -> ApplicationResult<Rfq> {
        authorization::require(principal.role, Action::CreateRfq)?;
        let validity_days = cmd
            .validity_days
            .unwrap_or(self.config.default_validity_days);
        self.registry
            .create(
                principal.user_id,
                cmd.product_id,
                cmd.quantity,
                cmd.message,
                validity_days,
            )
            .await
    }

    /// Lists the RFQs visible to the caller, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_rfqs(&self, principal: &Principal) -> ApplicationResult<Vec<Rfq>> {
        authorization::require(principal.role, Action::ListRfqs)?;
        self.registry.list_for(principal).await
    }

    /// Reads one RFQ.
    ///
    /// # Errors
    ///
    /// `NotFound` if the RFQ does not exist or is hidden from the caller.
    pub async fn get_rfq(&self, principal: &Principal, rfq_id: RfqId) -> ApplicationResult<Rfq> {
        let access = authorization::require(principal.role, Action::ViewRfq)?;
        let rfq = self.registry.get(rfq_id).await?;
        if !self.is_visible(principal, access, &rfq).await? {
            return Err(hidden_rfq(rfq_id));
        }
        Ok(rfq)
    }

    /// Submits a supplier quote.
    ///
    /// Returns the stored quote and the RFQ as updated by it.
    ///
    /// # Errors
    ///
    /// See [`QuoteLedger::submit`].
    pub async fn submit_quote(
        &self,
        principal: &Principal,
        cmd: SubmitQuote,
    ) -> ApplicationResult<QuoteSubmission> {
        authorization::require(principal.role, Action::SubmitQuote)?;
        self.ledger
            .submit(
                principal,
                cmd.rfq_id,
                cmd.price_per_unit,
                &cmd.delivery_time,
                cmd.message,
            )
            .await
    }

    /// Lists the quotes on an RFQ visible to the caller, oldest first.
    ///
    /// Buyers see every quote on their own RFQs; suppliers see only their
    /// own quote.
    ///
    /// # Errors
    ///
    /// `NotFound` if the RFQ does not exist or is hidden from the caller.
    pub async fn list_quotes(
        &self,
        principal: &Principal,
        rfq_id: RfqId,
    ) -> ApplicationResult<Vec<Quote>> {
        let access = authorization::require(principal.role, Action::ListQuotes)?;
        let rfq = self.registry.get(rfq_id).await?;
        let view = authorization::access(principal.role, Action::ViewRfq);
        if !self.is_visible(principal, view, &rfq).await? {
            return Err(hidden_rfq(rfq_id));
        }

        let quotes = self.ledger.list_for_rfq(rfq_id).await?;
        match access {
            Access::OwnRecords if !rfq.is_owned_by(principal.user_id) => Ok(quotes
                .into_iter()
                .filter(|quote| quote.supplier_id() == principal.user_id)
                .collect()),
            _ => Ok(quotes),
        }
    }

    /// Accepts a quote, closing its RFQ.
    ///
    /// Accepting the quote that already closed the RFQ succeeds again
    /// without changes.
    ///
    /// # Errors
    ///
    /// - `Authorization` for non-buyers
    /// - `NotFound` if the quote does not exist or its RFQ is not the caller's
    /// - `State` if the RFQ expired or another quote was accepted
    pub async fn accept_quote(
        &self,
        principal: &Principal,
        quote_id: QuoteId,
    ) -> ApplicationResult<Rfq> {
        authorization::require(principal.role, Action::AcceptQuote)?;
        let quote = self.ledger.get(quote_id).await?;
        let buyer_id = principal.user_id;

        let (rfq, changed) = self
            .registry
            .update_with(quote.rfq_id(), |rfq, now| {
                if !rfq.is_owned_by(buyer_id) {
                    return Err(ApplicationError::not_found("Quote", quote_id.to_string()));
                }
                Ok(rfq.accept_quote(&quote, now)?)
            })
            .await?;

        if changed {
            info!(
                rfq_id = %rfq.id(),
                quote_id = %quote_id,
                supplier_id = %quote.supplier_id(),
                "quote accepted"
            );
        }
        Ok(rfq)
    }

    /// Computes the caller's dashboard counters.
    ///
    /// # Errors
    ///
    /// Only fails if the role is denied; collaborator failures degrade
    /// individual counters instead.
    pub async fn get_stats(&self, principal: &Principal) -> ApplicationResult<DashboardStats> {
        authorization::require(principal.role, Action::ViewStats)?;
        Ok(self.stats.collect(principal).await)
    }

    /// Persists `expired` on every RFQ whose window has passed.
    ///
    /// Returns the number of RFQs transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the due RFQs cannot be listed.
    pub async fn expire_due(&self) -> ApplicationResult<usize> {
        self.registry.sweep_expired(Timestamp::now()).await
    }

    async fn is_visible(
        &self,
        principal: &Principal,
        access: Access,
        rfq: &Rfq,
    ) -> ApplicationResult<bool> {
        Ok(match access {
            Access::Denied => false,
            Access::Unrestricted => true,
            Access::OwnRecords => rfq.is_owned_by(principal.user_id),
            Access::OpenOrParticipating => {
                rfq.status_at(Timestamp::now()).accepts_quotes()
                    || self
                        .ledger
                        .list_for_rfq(rfq.id())
                        .await?
                        .iter()
                        .any(|quote| quote.supplier_id() == principal.user_id)
            }
        })
    }
}

fn hidden_rfq(rfq_id: RfqId) -> ApplicationError {
    ApplicationError::not_found("RFQ", rfq_id.to_string())
}
