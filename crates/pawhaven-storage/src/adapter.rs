// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

use pawhaven_config::model::StorageConfig;
use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ApplicationStatus, Collection, Compensation,
    ContactMessage, FoundPetReport, ListQuery, ListingStatus, LostPetReport, PetFields,
    ReportKind, ReportStatusUpdate,
};
use pawhaven_core::{AdapterType, HealthStatus, PawhavenError, PluginAdapter, StorageAdapter};

use crate::database::{Database, map_tr_err};
use crate::queries;
use crate::queries::applications::AtomicApproval;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, PawhavenError> {
        self.db.get().ok_or_else(|| PawhavenError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), PawhavenError> {
        db.connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PawhavenError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PawhavenError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PawhavenError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PawhavenError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PawhavenError> {
        let db = self.db()?;
        self.checkpoint(db).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Lost and found reports ---

    async fn insert_lost_report(&self, report: &LostPetReport) -> Result<(), PawhavenError> {
        queries::lost_pets::insert(self.db()?, report).await
    }

    async fn get_lost_report(&self, id: Uuid) -> Result<Option<LostPetReport>, PawhavenError> {
        queries::lost_pets::get(self.db()?, id).await
    }

    async fn list_lost_reports(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<LostPetReport>, PawhavenError> {
        queries::lost_pets::list(self.db()?, query).await
    }

    async fn insert_found_report(&self, report: &FoundPetReport) -> Result<(), PawhavenError> {
        queries::found_pets::insert(self.db()?, report).await
    }

    async fn get_found_report(&self, id: Uuid) -> Result<Option<FoundPetReport>, PawhavenError> {
        queries::found_pets::get(self.db()?, id).await
    }

    async fn list_found_reports(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<FoundPetReport>, PawhavenError> {
        queries::found_pets::list(self.db()?, query).await
    }

    async fn update_report_status(
        &self,
        kind: ReportKind,
        id: Uuid,
        update: &ReportStatusUpdate,
    ) -> Result<usize, PawhavenError> {
        queries::update_report_status(self.db()?, kind, id, update).await
    }

    async fn count(
        &self,
        collection: Collection,
        status: Option<&str>,
    ) -> Result<u64, PawhavenError> {
        queries::count(self.db()?, collection, status).await
    }

    // --- Adoption listings ---

    async fn insert_pet(&self, pet: &AdoptionPet) -> Result<(), PawhavenError> {
        queries::adoption_pets::insert(self.db()?, pet).await
    }

    async fn get_pet(&self, id: Uuid) -> Result<Option<AdoptionPet>, PawhavenError> {
        queries::adoption_pets::get(self.db()?, id).await
    }

    async fn list_pets(&self, query: &ListQuery) -> Result<Vec<AdoptionPet>, PawhavenError> {
        queries::adoption_pets::list(self.db()?, query).await
    }

    async fn update_pet_fields(
        &self,
        id: Uuid,
        fields: &PetFields,
    ) -> Result<usize, PawhavenError> {
        queries::adoption_pets::update_fields(self.db()?, id, fields).await
    }

    async fn update_pet_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<usize, PawhavenError> {
        queries::adoption_pets::update_status(self.db()?, id, status).await
    }

    async fn delete_pet(&self, id: Uuid) -> Result<usize, PawhavenError> {
        queries::adoption_pets::delete(self.db()?, id).await
    }

    async fn delete_pet_cascade(&self, id: Uuid) -> Result<usize, PawhavenError> {
        queries::adoption_pets::delete_cascade(self.db()?, id).await
    }

    // --- Adoption applications ---

    async fn insert_application(
        &self,
        application: &AdoptionApplication,
    ) -> Result<(), PawhavenError> {
        queries::applications::insert(self.db()?, application).await
    }

    async fn get_application(
        &self,
        id: Uuid,
    ) -> Result<Option<AdoptionApplication>, PawhavenError> {
        queries::applications::get(self.db()?, id).await
    }

    async fn list_applications(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AdoptionApplication>, PawhavenError> {
        queries::applications::list(self.db()?, query).await
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<usize, PawhavenError> {
        queries::applications::update_status(self.db()?, id, status).await
    }

    async fn count_applications_for_pet(&self, pet_id: Uuid) -> Result<u64, PawhavenError> {
        queries::applications::count_for_pet(self.db()?, pet_id).await
    }

    fn supports_transactions(&self) -> bool {
        true
    }

    async fn approve_application_atomic(
        &self,
        application_id: Uuid,
        pet_id: Uuid,
    ) -> Result<(), PawhavenError> {
        match queries::applications::approve_atomic(self.db()?, application_id, pet_id).await? {
            AtomicApproval::Applied => Ok(()),
            AtomicApproval::ApplicationMissing => Err(PawhavenError::ZeroRows {
                collection: Collection::AdoptionApplications,
                id: application_id,
            }),
            AtomicApproval::PetMissing => Err(PawhavenError::ZeroRows {
                collection: Collection::AdoptionPets,
                id: pet_id,
            }),
        }
    }

    // --- Compensation log ---

    async fn record_compensation(&self, entry: &Compensation) -> Result<(), PawhavenError> {
        queries::compensation::record(self.db()?, entry).await
    }

    async fn clear_compensation(&self, id: Uuid) -> Result<(), PawhavenError> {
        queries::compensation::clear(self.db()?, id).await
    }

    async fn list_compensations(&self) -> Result<Vec<Compensation>, PawhavenError> {
        queries::compensation::list(self.db()?).await
    }

    // --- Contact messages ---

    async fn insert_message(&self, message: &ContactMessage) -> Result<(), PawhavenError> {
        queries::contact::insert(self.db()?, message).await
    }

    async fn list_messages(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<ContactMessage>, PawhavenError> {
        queries::contact::list(self.db()?, query).await
    }

    async fn mark_message_read(&self, id: Uuid) -> Result<usize, PawhavenError> {
        queries::contact::mark_read(self.db()?, id).await
    }
}
