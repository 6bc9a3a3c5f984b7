//! # Expiry Sweeper
//!
//! Background task that persists `expired` on RFQs whose window has passed.
//!
//! Reads already report overdue RFQs as expired; the sweeper only keeps the
//! stored status and the status counters in line with that view.

use crate::application::services::negotiation::NegotiationCoordinator;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Default delay between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic expiry sweep over a [`NegotiationCoordinator`].
#[derive(Debug, Clone)]
pub struct ExpirySweeper {
    coordinator: NegotiationCoordinator,
    interval: Duration,
}

impl ExpirySweeper {
    /// Creates a sweeper running every `interval`.
    #[must_use]
    pub fn new(coordinator: NegotiationCoordinator, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
        }
    }

    /// Returns the sweep interval.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one sweep, returning the number of RFQs expired.
    ///
    /// Failures are logged and reported as zero.
    pub async fn sweep_once(&self) -> usize {
        match self.coordinator.expire_due().await {
            Ok(expired) => {
                debug!(expired, "expiry sweep completed");
                expired
            }
            Err(err) => {
                error!(error = %err, "expiry sweep failed");
                0
            }
        }
    }

    /// Sweeps on every tick until `shutdown` flips to `true` or its sender
    /// is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("expiry sweeper stopped");
    }
}
