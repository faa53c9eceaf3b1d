// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin dashboard aggregation.
//!
//! Six counts and four recent-item reads are issued concurrently. A failed
//! sub-query contributes zero or nothing rather than failing the whole page.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use pawhaven_config::model::DashboardConfig;
use pawhaven_core::types::{
    AdoptionApplication, ContactMessage, FoundPetReport, ListQuery, LostPetReport,
};
use pawhaven_core::{
    ApplicationStatus, Collection, ListingStatus, PawhavenError, ReportStatus, Session,
    StorageAdapter,
};

/// Which collection a recent activity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Lost,
    Found,
    Adoption,
    ContactMessage,
}

/// One line of the dashboard's recent activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub subtitle: String,
    pub created_at: DateTime<Utc>,
}

impl From<LostPetReport> for Activity {
    fn from(report: LostPetReport) -> Self {
        Self {
            id: report.id,
            kind: ActivityKind::Lost,
            title: format!(
                "New lost pet report: {}",
                report.pet_name.as_deref().unwrap_or("Unknown")
            ),
            subtitle: format!("Lost at {}", report.last_seen_location),
            created_at: report.created_at,
        }
    }
}

impl From<FoundPetReport> for Activity {
    fn from(report: FoundPetReport) -> Self {
        let title = match &report.breed {
            Some(breed) => format!("New found pet report: {} ({breed})", report.pet_type),
            None => format!("New found pet report: {}", report.pet_type),
        };
        Self {
            id: report.id,
            kind: ActivityKind::Found,
            title,
            subtitle: format!("Found at {}", report.found_location),
            created_at: report.created_at,
        }
    }
}

impl From<AdoptionApplication> for Activity {
    fn from(application: AdoptionApplication) -> Self {
        let pet = match application.pet_name.as_str() {
            "" | "Unknown" => "a pet",
            name => name,
        };
        Self {
            id: application.id,
            kind: ActivityKind::Adoption,
            title: "New adoption application".to_string(),
            subtitle: format!("{} applied for {pet}", application.applicant_name),
            created_at: application.created_at,
        }
    }
}

impl From<ContactMessage> for Activity {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id,
            kind: ActivityKind::ContactMessage,
            title: "New Contact Message".to_string(),
            subtitle: format!("{} sent: \"{}\"", message.name, message.subject),
            created_at: message.created_at,
        }
    }
}

/// Headline numbers and the merged recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub approved_lost: u64,
    pub approved_found: u64,
    pub available_pets: u64,
    /// Pending lost + pending found + pending applications.
    pub pending_approvals: u64,
    pub recent_activities: Vec<Activity>,
}

/// Sorts newest first and keeps the top `limit`.
pub fn merge_recent(mut activities: Vec<Activity>, limit: usize) -> Vec<Activity> {
    activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    activities.truncate(limit);
    activities
}

async fn or_degraded<T: Default>(
    label: &str,
    read: impl Future<Output = Result<T, PawhavenError>>,
) -> T {
    match read.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(query = label, error = %e, "dashboard sub-query failed, using empty result");
            T::default()
        }
    }
}

pub struct Dashboard {
    storage: Arc<dyn StorageAdapter>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(storage: Arc<dyn StorageAdapter>, config: DashboardConfig) -> Self {
        Self { storage, config }
    }

    pub async fn stats(&self, session: &Session) -> Result<DashboardStats, PawhavenError> {
        session.require_admin()?;
        let store = &self.storage;

        let approved = ReportStatus::Approved.to_string();
        let pending = ReportStatus::Pending.to_string();
        let available = ListingStatus::Available.to_string();
        let pending_application = ApplicationStatus::Pending.to_string();

        let (
            approved_lost,
            approved_found,
            available_pets,
            pending_lost,
            pending_found,
            pending_applications,
        ) = futures::join!(
            or_degraded(
                "approved lost",
                store.count(Collection::LostPets, Some(approved.as_str()))
            ),
            or_degraded(
                "approved found",
                store.count(Collection::FoundPets, Some(approved.as_str()))
            ),
            or_degraded(
                "available pets",
                store.count(Collection::AdoptionPets, Some(available.as_str()))
            ),
            or_degraded(
                "pending lost",
                store.count(Collection::LostPets, Some(pending.as_str()))
            ),
            or_degraded(
                "pending found",
                store.count(Collection::FoundPets, Some(pending.as_str()))
            ),
            or_degraded(
                "pending applications",
                store.count(Collection::AdoptionApplications, Some(pending_application.as_str()))
            ),
        );

        let recent = ListQuery::newest(self.config.recent_per_source);
        let (lost, found, applications, messages) = futures::join!(
            or_degraded("recent lost", store.list_lost_reports(&recent)),
            or_degraded("recent found", store.list_found_reports(&recent)),
            or_degraded("recent applications", store.list_applications(&recent)),
            or_degraded("recent messages", store.list_messages(&recent)),
        );

        let activities = lost
            .into_iter()
            .map(Activity::from)
            .chain(found.into_iter().map(Activity::from))
            .chain(applications.into_iter().map(Activity::from))
            .chain(messages.into_iter().map(Activity::from))
            .collect();

        Ok(DashboardStats {
            approved_lost,
            approved_found,
            available_pets,
            pending_approvals: pending_lost + pending_found + pending_applications,
            recent_activities: merge_recent(activities, self.config.recent_limit),
        })
    }
}
