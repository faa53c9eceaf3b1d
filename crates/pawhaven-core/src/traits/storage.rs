// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, in-memory mocks).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PawhavenError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    AdoptionApplication, AdoptionPet, ApplicationStatus, Collection, Compensation,
    ContactMessage, FoundPetReport, ListQuery, ListingStatus, LostPetReport, PetFields,
    ReportKind, ReportStatusUpdate,
};

/// Adapter for the record store.
///
/// Reads are `select ... where <status> order by created_at [limit N]` over one
/// collection. Writes by id return the number of affected rows; callers turn
/// `0` into [`PawhavenError::ZeroRows`]. Transport failures surface as
/// [`PawhavenError::Storage`].
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PawhavenError>;

    /// Closes the storage backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), PawhavenError>;

    // --- Lost and found reports ---

    async fn insert_lost_report(&self, report: &LostPetReport) -> Result<(), PawhavenError>;

    async fn get_lost_report(&self, id: Uuid) -> Result<Option<LostPetReport>, PawhavenError>;

    async fn list_lost_reports(&self, query: &ListQuery)
    -> Result<Vec<LostPetReport>, PawhavenError>;

    async fn insert_found_report(&self, report: &FoundPetReport) -> Result<(), PawhavenError>;

    async fn get_found_report(&self, id: Uuid) -> Result<Option<FoundPetReport>, PawhavenError>;

    async fn list_found_reports(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<FoundPetReport>, PawhavenError>;

    /// Writes status and reunion fields of a lost or found report.
    async fn update_report_status(
        &self,
        kind: ReportKind,
        id: Uuid,
        update: &ReportStatusUpdate,
    ) -> Result<usize, PawhavenError>;

    /// Counts rows in `collection`, optionally filtered by status wire form.
    ///
    /// For contact messages the status is `read` or `unread`.
    async fn count(&self, collection: Collection, status: Option<&str>)
    -> Result<u64, PawhavenError>;

    // --- Adoption listings ---

    async fn insert_pet(&self, pet: &AdoptionPet) -> Result<(), PawhavenError>;

    async fn get_pet(&self, id: Uuid) -> Result<Option<AdoptionPet>, PawhavenError>;

    async fn list_pets(&self, query: &ListQuery) -> Result<Vec<AdoptionPet>, PawhavenError>;

    /// Overwrites the mutable fields of a listing; status is untouched.
    /// Blank optional strings are stored as NULL.
    async fn update_pet_fields(&self, id: Uuid, fields: &PetFields)
    -> Result<usize, PawhavenError>;

    async fn update_pet_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<usize, PawhavenError>;

    async fn delete_pet(&self, id: Uuid) -> Result<usize, PawhavenError>;

    /// Deletes the listing and every application referencing it together.
    /// Returns the number of listings deleted.
    async fn delete_pet_cascade(&self, id: Uuid) -> Result<usize, PawhavenError>;

    // --- Adoption applications ---

    async fn insert_application(
        &self,
        application: &AdoptionApplication,
    ) -> Result<(), PawhavenError>;

    async fn get_application(
        &self,
        id: Uuid,
    ) -> Result<Option<AdoptionApplication>, PawhavenError>;

    async fn list_applications(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AdoptionApplication>, PawhavenError>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<usize, PawhavenError>;

    async fn count_applications_for_pet(&self, pet_id: Uuid) -> Result<u64, PawhavenError>;

    /// Whether [`approve_application_atomic`](Self::approve_application_atomic)
    /// is available.
    fn supports_transactions(&self) -> bool {
        false
    }

    /// Approves the application and marks the pet unavailable in one
    /// transaction. A zero-row match on either write rolls both back and
    /// returns `ZeroRows` for the collection that missed.
    async fn approve_application_atomic(
        &self,
        application_id: Uuid,
        pet_id: Uuid,
    ) -> Result<(), PawhavenError> {
        let _ = (application_id, pet_id);
        Err(PawhavenError::Internal(format!(
            "storage adapter `{}` does not support transactions",
            self.name()
        )))
    }

    // --- Compensation log ---

    async fn record_compensation(&self, entry: &Compensation) -> Result<(), PawhavenError>;

    async fn clear_compensation(&self, id: Uuid) -> Result<(), PawhavenError>;

    /// Pending entries, oldest first.
    async fn list_compensations(&self) -> Result<Vec<Compensation>, PawhavenError>;

    // --- Contact messages ---

    async fn insert_message(&self, message: &ContactMessage) -> Result<(), PawhavenError>;

    /// `query.status` may be `read` or `unread`.
    async fn list_messages(&self, query: &ListQuery)
    -> Result<Vec<ContactMessage>, PawhavenError>;

    async fn mark_message_read(&self, id: Uuid) -> Result<usize, PawhavenError>;
}
