// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repairs two-step approvals that stopped halfway.
//!
//! Every pending compensation record names an application and its pet. If the
//! application is approved, the pet is written `unavailable` and the record is
//! cleared. If the application never reached `approved`, step one did not
//! land and the record is cleared, but only once it is older than the grace
//! window. A younger record may belong to an approval still in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use pawhaven_core::types::Compensation;
use pawhaven_core::{ApplicationStatus, ListingStatus, PawhavenError, StorageAdapter};

use crate::Caches;
use crate::cache::read_with_retry;

/// Totals for one reconciler pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub examined: usize,
    /// Pets marked unavailable after their application was approved.
    pub repaired: usize,
    /// Records dropped because there was nothing to repair.
    pub cleared: usize,
    /// Unapproved records still inside the grace window.
    pub deferred: usize,
    /// Records left in place for the next pass.
    pub failed: usize,
}

enum Outcome {
    Repaired,
    Cleared,
    Deferred,
}

/// Shortest grace window, used when the pass interval is shorter or disabled.
pub const MIN_GRACE: Duration = Duration::from_secs(60);

pub struct Reconciler {
    storage: Arc<dyn StorageAdapter>,
    caches: Arc<Caches>,
    grace: Duration,
}

impl Reconciler {
    pub fn new(storage: Arc<dyn StorageAdapter>, caches: Arc<Caches>, grace: Duration) -> Self {
        Self {
            storage,
            caches,
            grace,
        }
    }

    /// One pass over the compensation log, oldest first.
    pub async fn run_once(&self) -> Result<ReconcileReport, PawhavenError> {
        let entries =
            read_with_retry("compensations", || self.storage.list_compensations()).await?;

        let mut report = ReconcileReport::default();
        for entry in &entries {
            report.examined += 1;
            match self.reconcile(entry).await {
                Ok(Outcome::Repaired) => report.repaired += 1,
                Ok(Outcome::Cleared) => report.cleared += 1,
                Ok(Outcome::Deferred) => report.deferred += 1,
                Err(e) => {
                    tracing::warn!(
                        compensation_id = %entry.id,
                        application_id = %entry.application_id,
                        error = %e,
                        "compensation left for next pass"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.repaired > 0 {
            self.caches.pets.invalidate().await;
        }
        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                repaired = report.repaired,
                cleared = report.cleared,
                deferred = report.deferred,
                failed = report.failed,
                "reconciler pass complete"
            );
        }
        Ok(report)
    }

    async fn reconcile(&self, entry: &Compensation) -> Result<Outcome, PawhavenError> {
        let application = self.storage.get_application(entry.application_id).await?;
        let approved = application.is_some_and(|a| a.status == ApplicationStatus::Approved);

        let outcome = if approved {
            let rows = self
                .storage
                .update_pet_status(entry.pet_id, ListingStatus::Unavailable)
                .await?;
            if rows == 0 {
                // The pet is gone, so there is nothing left to take off the market.
                tracing::warn!(pet_id = %entry.pet_id, "approved application references a missing pet");
                Outcome::Cleared
            } else {
                tracing::info!(
                    application_id = %entry.application_id,
                    pet_id = %entry.pet_id,
                    "pet marked unavailable by reconciler"
                );
                Outcome::Repaired
            }
        } else if self.within_grace(entry) {
            return Ok(Outcome::Deferred);
        } else {
            Outcome::Cleared
        };

        self.storage.clear_compensation(entry.id).await?;
        Ok(outcome)
    }

    fn within_grace(&self, entry: &Compensation) -> bool {
        // A record stamped in the future (clock skew) counts as fresh.
        (Utc::now() - entry.created_at)
            .to_std()
            .map_or(true, |age| age < self.grace)
    }

    /// Runs a pass every `interval` until `cancel` fires.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::warn!(error = %e, "reconciler pass failed");
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("reconciler shutting down");
                    break;
                }
            }
        }
    }
}
