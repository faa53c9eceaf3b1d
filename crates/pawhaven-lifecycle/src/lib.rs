// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle services for Pawhaven.
//!
//! Each service owns one slice of the status machines: lost and found
//! reports, adoption listings, adoption applications, and contact messages.
//! Services take an explicit [`Session`](pawhaven_core::Session) on every call,
//! talk to the store only through [`StorageAdapter`], and share one set of
//! per-collection [`QueryCache`]s.

pub mod adoption;
pub mod badge;
pub mod cache;
pub mod contact;
pub mod dashboard;
pub mod filter;
pub mod listings;
pub mod reconcile;
pub mod reports;
pub mod validation;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pawhaven_config::PawhavenConfig;
use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, Collection, ContactMessage, FoundPetReport, LostPetReport,
};
use pawhaven_core::{PawhavenError, StorageAdapter};

pub use adoption::AdoptionService;
pub use cache::QueryCache;
pub use contact::{ContactService, reply_link};
pub use dashboard::{Activity, ActivityKind, Dashboard, DashboardStats};
pub use filter::{ListingFilter, PetFilter, ReportFilter, Searchable};
pub use listings::ListingService;
pub use reconcile::{MIN_GRACE, ReconcileReport, Reconciler};
pub use reports::ReportService;

/// One query cache per collection, shared by every service.
pub struct Caches {
    pub lost: QueryCache<LostPetReport>,
    pub found: QueryCache<FoundPetReport>,
    pub pets: QueryCache<AdoptionPet>,
    pub applications: QueryCache<AdoptionApplication>,
    pub messages: QueryCache<ContactMessage>,
}

impl Caches {
    pub fn new() -> Self {
        Self {
            lost: QueryCache::new(Collection::LostPets),
            found: QueryCache::new(Collection::FoundPets),
            pets: QueryCache::new(Collection::AdoptionPets),
            applications: QueryCache::new(Collection::AdoptionApplications),
            messages: QueryCache::new(Collection::ContactMessages),
        }
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new()
    }
}

/// Every lifecycle service wired to one store and one cache set.
#[derive(Clone)]
pub struct Services {
    pub reports: Arc<ReportService>,
    pub listings: Arc<ListingService>,
    pub adoption: Arc<AdoptionService>,
    pub contact: Arc<ContactService>,
    pub dashboard: Arc<Dashboard>,
    pub reconciler: Arc<Reconciler>,
}

impl Services {
    pub fn new(storage: Arc<dyn StorageAdapter>, config: &PawhavenConfig) -> Self {
        let caches = Arc::new(Caches::new());
        let lifecycle = &config.lifecycle;
        Self {
            reports: Arc::new(ReportService::new(
                storage.clone(),
                caches.clone(),
                lifecycle.enforce_terminal_states,
            )),
            listings: Arc::new(ListingService::new(
                storage.clone(),
                caches.clone(),
                lifecycle.pet_delete_policy,
            )),
            adoption: Arc::new(AdoptionService::new(
                storage.clone(),
                caches.clone(),
                lifecycle.approval_mode,
                lifecycle.enforce_terminal_states,
            )),
            contact: Arc::new(ContactService::new(storage.clone(), caches.clone())),
            dashboard: Arc::new(Dashboard::new(storage.clone(), config.dashboard.clone())),
            reconciler: Arc::new(Reconciler::new(
                storage,
                caches,
                Duration::from_secs(lifecycle.reconcile_interval_secs).max(reconcile::MIN_GRACE),
            )),
        }
    }
}

/// Parses a status wire form, rejecting unknown values with `Validation`.
pub fn parse_status<S: FromStr>(label: &str, raw: &str) -> Result<S, PawhavenError> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| PawhavenError::Validation(format!("unknown {label} status: {raw}")))
}

/// Turns a zero-row write into `ZeroRows`.
pub(crate) fn ensure_matched(
    rows: usize,
    collection: Collection,
    id: Uuid,
) -> Result<(), PawhavenError> {
    if rows == 0 {
        return Err(PawhavenError::ZeroRows { collection, id });
    }
    Ok(())
}
