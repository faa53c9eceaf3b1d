// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types, status enums, and form inputs shared across crates.
//!
//! Rows from the store are mapped into these types at the storage boundary;
//! nothing downstream works with untyped rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Auth,
    Media,
}

/// The five collections held by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    LostPets,
    FoundPets,
    AdoptionPets,
    AdoptionApplications,
    ContactMessages,
}

/// Which side of the lost/found pair a report belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
}

impl ReportKind {
    pub fn collection(self) -> Collection {
        match self {
            Self::Lost => Collection::LostPets,
            Self::Found => Collection::FoundPets,
        }
    }
}

/// Status of a lost or found report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
    Reunited,
}

impl ReportStatus {
    /// Capitalized display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Reunited => "Reunited",
        }
    }

    /// `rejected` and `reunited` end the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Reunited)
    }
}

/// Status of an adoption listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Unavailable,
}

impl ListingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
        }
    }
}

/// Status of an adoption application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// --- Records ---

/// A user-submitted report of a lost pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostPetReport {
    pub id: Uuid,
    pub pet_name: Option<String>,
    pub pet_type: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub last_seen_location: String,
    pub last_seen_date: NaiveDate,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub reunite_story: Option<String>,
    pub reunite_date: Option<DateTime<Utc>>,
    pub user_id: Uuid,
}

/// A user-submitted report of a found pet. Found pets have no known name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundPetReport {
    pub id: Uuid,
    pub pet_type: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub found_location: String,
    pub found_date: NaiveDate,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub reunite_story: Option<String>,
    pub reunite_date: Option<DateTime<Utc>>,
    pub user_id: Uuid,
}

/// A shelter-listed pet available for adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionPet {
    pub id: Uuid,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub location: String,
    pub image_url: Option<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// A request to adopt a listing, joined with the listing's display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionApplication {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub reason: Option<String>,
    pub living_situation: Option<String>,
    pub experience: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    /// "Unknown" when the referenced pet no longer exists.
    pub pet_name: String,
    pub pet_type: String,
    pub pet_breed: Option<String>,
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Any record the service handles, tagged by entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PetRecord {
    Lost(LostPetReport),
    Found(FoundPetReport),
    Adoption(AdoptionPet),
    Application(AdoptionApplication),
    Contact(ContactMessage),
}

impl PetRecord {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Lost(r) => r.id,
            Self::Found(r) => r.id,
            Self::Adoption(r) => r.id,
            Self::Application(r) => r.id,
            Self::Contact(r) => r.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Lost(r) => r.created_at,
            Self::Found(r) => r.created_at,
            Self::Adoption(r) => r.created_at,
            Self::Application(r) => r.created_at,
            Self::Contact(r) => r.created_at,
        }
    }

    /// Badge label for the record's current state.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Lost(r) => r.status.label(),
            Self::Found(r) => r.status.label(),
            Self::Adoption(r) => r.status.label(),
            Self::Application(r) => r.status.label(),
            Self::Contact(r) if r.read => "Read",
            Self::Contact(_) => "Unread",
        }
    }
}

// --- Store request types ---

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Equality filter, ordering, and limit for a collection read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Wire form of the status to match, if any.
    pub status: Option<String>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Newest first, no filter, no limit.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: impl ToString) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub fn newest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Status write for a lost or found report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStatusUpdate {
    pub status: ReportStatus,
    pub reunite_story: Option<String>,
    pub reunite_date: Option<DateTime<Utc>>,
}

impl ReportStatusUpdate {
    /// A plain status write. Reunion fields are cleared.
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status,
            reunite_story: None,
            reunite_date: None,
        }
    }

    pub fn reunited(story: String, at: DateTime<Utc>) -> Self {
        Self {
            status: ReportStatus::Reunited,
            reunite_story: Some(story),
            reunite_date: Some(at),
        }
    }
}

/// A pending compensation for a two-step application approval.
///
/// Written before the application write and cleared once the pet has been
/// marked unavailable. Anything left over is repaired by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub id: Uuid,
    pub application_id: Uuid,
    pub pet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- Form inputs ---

/// Form input for a lost-pet report. Blank optional fields are stored as NULL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewLostReport {
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub color: String,
    pub description: String,
    pub last_seen_location: String,
    /// `YYYY-MM-DD`.
    pub last_seen_date: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub image_url: String,
}

/// Form input for a found-pet report.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewFoundReport {
    pub pet_type: String,
    pub breed: String,
    pub color: String,
    pub description: String,
    pub found_location: String,
    /// `YYYY-MM-DD`.
    pub found_date: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub image_url: String,
}

/// Mutable fields of an adoption listing, used for both add and edit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PetFields {
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub color: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
}

/// Form input for an adoption application.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewApplication {
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: String,
    pub reason: String,
    pub living_situation: String,
    pub experience: String,
}

/// Form input for the public contact form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn report_status_wire_form_is_lowercase() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Approved,
            ReportStatus::Rejected,
            ReportStatus::Reunited,
        ] {
            let s = status.to_string();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(ReportStatus::from_str(&s).unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{s}\""));
        }
    }

    #[test]
    fn unknown_status_does_not_parse() {
        assert!(ReportStatus::from_str("archived").is_err());
        assert!(ListingStatus::from_str("sold").is_err());
        assert!(ApplicationStatus::from_str("withdrawn").is_err());
    }

    #[test]
    fn collection_names_match_store_tables() {
        assert_eq!(Collection::LostPets.to_string(), "lost_pets");
        assert_eq!(
            Collection::AdoptionApplications.to_string(),
            "adoption_applications"
        );
        assert_eq!(ReportKind::Found.collection(), Collection::FoundPets);
    }

    #[test]
    fn terminal_statuses() {
        assert!(ReportStatus::Rejected.is_terminal());
        assert!(ReportStatus::Reunited.is_terminal());
        assert!(!ReportStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(!ApplicationStatus::Pending.is_terminal());
    }

    #[test]
    fn plain_status_update_clears_reunion_fields() {
        let update = ReportStatusUpdate::status(ReportStatus::Pending);
        assert!(update.reunite_story.is_none());
        assert!(update.reunite_date.is_none());
    }

    #[test]
    fn contact_record_label_tracks_read_flag() {
        let mut msg = ContactMessage {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
            read: false,
            created_at: Utc::now(),
        };
        assert_eq!(PetRecord::Contact(msg.clone()).status_label(), "Unread");
        msg.read = true;
        assert_eq!(PetRecord::Contact(msg).status_label(), "Read");
    }
}
