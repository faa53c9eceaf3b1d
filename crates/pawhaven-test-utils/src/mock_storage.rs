// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for deterministic lifecycle tests.
//!
//! `MockStorage` implements `StorageAdapter` over plain vectors, records the
//! name of every trait method called (in order), and lets a test make any
//! method fail with a transport error or match zero rows.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ApplicationStatus, Collection, Compensation,
    ContactMessage, FoundPetReport, ListQuery, ListingStatus, LostPetReport, PetFields,
    ReportKind, ReportStatusUpdate, SortOrder,
};
use pawhaven_core::{AdapterType, HealthStatus, PawhavenError, PluginAdapter, StorageAdapter};

/// Behavior injected for one storage method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injected {
    /// Return a `Storage` error without touching state.
    Fail,
    /// Report zero affected rows without touching state (writes by id only).
    ZeroRows,
}

#[derive(Default)]
struct State {
    lost: Vec<LostPetReport>,
    found: Vec<FoundPetReport>,
    pets: Vec<AdoptionPet>,
    applications: Vec<AdoptionApplication>,
    messages: Vec<ContactMessage>,
    compensations: Vec<Compensation>,
    calls: Vec<&'static str>,
    injected: HashMap<&'static str, Injected>,
}

impl State {
    /// Record the call and return the injected behavior, if any.
    fn enter(&mut self, op: &'static str) -> Result<Option<Injected>, PawhavenError> {
        self.calls.push(op);
        match self.injected.get(op).copied() {
            Some(Injected::Fail) => Err(PawhavenError::Storage {
                source: format!("injected failure in {op}").into(),
            }),
            other => Ok(other),
        }
    }

    fn join(&self, mut application: AdoptionApplication) -> AdoptionApplication {
        match self.pets.iter().find(|p| p.id == application.pet_id) {
            Some(pet) => {
                application.pet_name = pet.pet_name.clone();
                application.pet_type = pet.pet_type.clone();
                application.pet_breed = pet.breed.clone();
            }
            None => {
                application.pet_name = "Unknown".to_string();
                application.pet_type = "Unknown".to_string();
                application.pet_breed = None;
            }
        }
        application
    }
}

/// Apply status filter, created_at ordering, and limit.
fn select<T: Clone>(
    rows: &[T],
    query: &ListQuery,
    status_of: impl Fn(&T) -> String,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    // Later inserts win ties, matching the rowid tiebreak in SQLite.
    let mut selected: Vec<(usize, T)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| query.status.as_ref().is_none_or(|s| status_of(row) == *s))
        .map(|(i, row)| (i, row.clone()))
        .collect();
    selected.sort_by(|(ia, a), (ib, b)| {
        let ord = created_at(a).cmp(&created_at(b)).then(ia.cmp(ib));
        match query.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    let limit = query.limit.unwrap_or(usize::MAX);
    selected.into_iter().take(limit).map(|(_, row)| row).collect()
}

fn message_status(message: &ContactMessage) -> String {
    if message.read { "read" } else { "unread" }.to_string()
}

/// A mock storage adapter for testing.
#[derive(Clone)]
pub struct MockStorage {
    state: Arc<Mutex<State>>,
    transactions: bool,
}

impl MockStorage {
    /// An empty store without transaction support.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            transactions: false,
        }
    }

    /// An empty store that reports `supports_transactions() == true`.
    pub fn with_transactions() -> Self {
        Self {
            transactions: true,
            ..Self::new()
        }
    }

    /// Make every later call to `op` behave as `behavior`.
    pub async fn inject(&self, op: &'static str, behavior: Injected) {
        self.state.lock().await.injected.insert(op, behavior);
    }

    pub async fn clear_injections(&self) {
        self.state.lock().await.injected.clear();
    }

    /// Names of all storage methods called so far, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self, op: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    // Direct seeding, bypassing the call log.

    pub async fn seed_lost(&self, report: LostPetReport) {
        self.state.lock().await.lost.push(report);
    }

    pub async fn seed_found(&self, report: FoundPetReport) {
        self.state.lock().await.found.push(report);
    }

    pub async fn seed_pet(&self, pet: AdoptionPet) {
        self.state.lock().await.pets.push(pet);
    }

    pub async fn seed_application(&self, application: AdoptionApplication) {
        self.state.lock().await.applications.push(application);
    }

    pub async fn seed_message(&self, message: ContactMessage) {
        self.state.lock().await.messages.push(message);
    }

    pub async fn seed_compensation(&self, entry: Compensation) {
        self.state.lock().await.compensations.push(entry);
    }

    // Direct inspection, bypassing the call log.

    pub async fn pet(&self, id: Uuid) -> Option<AdoptionPet> {
        self.state.lock().await.pets.iter().find(|p| p.id == id).cloned()
    }

    pub async fn application(&self, id: Uuid) -> Option<AdoptionApplication> {
        let state = self.state.lock().await;
        state
            .applications
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .map(|a| state.join(a))
    }

    pub async fn lost(&self, id: Uuid) -> Option<LostPetReport> {
        self.state.lock().await.lost.iter().find(|r| r.id == id).cloned()
    }

    pub async fn found(&self, id: Uuid) -> Option<FoundPetReport> {
        self.state.lock().await.found.iter().find(|r| r.id == id).cloned()
    }

    pub async fn compensations(&self) -> Vec<Compensation> {
        self.state.lock().await.compensations.clone()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStorage {
    fn name(&self) -> &str {
        "mock-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PawhavenError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PawhavenError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MockStorage {
    async fn initialize(&self) -> Result<(), PawhavenError> {
        self.state.lock().await.enter("initialize")?;
        Ok(())
    }

    async fn close(&self) -> Result<(), PawhavenError> {
        self.state.lock().await.enter("close")?;
        Ok(())
    }

    async fn insert_lost_report(&self, report: &LostPetReport) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("insert_lost_report")?;
        state.lost.push(report.clone());
        Ok(())
    }

    async fn get_lost_report(&self, id: Uuid) -> Result<Option<LostPetReport>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("get_lost_report")?;
        Ok(state.lost.iter().find(|r| r.id == id).cloned())
    }

    async fn list_lost_reports(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<LostPetReport>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_lost_reports")?;
        Ok(select(&state.lost, query, |r| r.status.to_string(), |r| r.created_at))
    }

    async fn insert_found_report(&self, report: &FoundPetReport) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("insert_found_report")?;
        state.found.push(report.clone());
        Ok(())
    }

    async fn get_found_report(&self, id: Uuid) -> Result<Option<FoundPetReport>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("get_found_report")?;
        Ok(state.found.iter().find(|r| r.id == id).cloned())
    }

    async fn list_found_reports(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<FoundPetReport>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_found_reports")?;
        Ok(select(&state.found, query, |r| r.status.to_string(), |r| r.created_at))
    }

    async fn update_report_status(
        &self,
        kind: ReportKind,
        id: Uuid,
        update: &ReportStatusUpdate,
    ) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("update_report_status")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        let target = match kind {
            ReportKind::Lost => state.lost.iter_mut().find(|r| r.id == id).map(|r| {
                (&mut r.status, &mut r.reunite_story, &mut r.reunite_date)
            }),
            ReportKind::Found => state.found.iter_mut().find(|r| r.id == id).map(|r| {
                (&mut r.status, &mut r.reunite_story, &mut r.reunite_date)
            }),
        };
        match target {
            Some((status, story, date)) => {
                *status = update.status;
                *story = update.reunite_story.clone();
                *date = update.reunite_date;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(
        &self,
        collection: Collection,
        status: Option<&str>,
    ) -> Result<u64, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("count")?;
        let matches = |s: String| status.is_none_or(|want| want == s);
        let n = match collection {
            Collection::LostPets => state
                .lost
                .iter()
                .filter(|r| matches(r.status.to_string()))
                .count(),
            Collection::FoundPets => state
                .found
                .iter()
                .filter(|r| matches(r.status.to_string()))
                .count(),
            Collection::AdoptionPets => state
                .pets
                .iter()
                .filter(|p| matches(p.status.to_string()))
                .count(),
            Collection::AdoptionApplications => state
                .applications
                .iter()
                .filter(|a| matches(a.status.to_string()))
                .count(),
            Collection::ContactMessages => state
                .messages
                .iter()
                .filter(|m| matches(message_status(m)))
                .count(),
        };
        Ok(n as u64)
    }

    async fn insert_pet(&self, pet: &AdoptionPet) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("insert_pet")?;
        state.pets.push(pet.clone());
        Ok(())
    }

    async fn get_pet(&self, id: Uuid) -> Result<Option<AdoptionPet>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("get_pet")?;
        Ok(state.pets.iter().find(|p| p.id == id).cloned())
    }

    async fn list_pets(&self, query: &ListQuery) -> Result<Vec<AdoptionPet>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_pets")?;
        Ok(select(&state.pets, query, |p| p.status.to_string(), |p| p.created_at))
    }

    async fn update_pet_fields(
        &self,
        id: Uuid,
        fields: &PetFields,
    ) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("update_pet_fields")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        let blank = |s: &str| {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        };
        match state.pets.iter_mut().find(|p| p.id == id) {
            Some(pet) => {
                pet.pet_name = fields.pet_name.trim().to_string();
                pet.pet_type = fields.pet_type.trim().to_string();
                pet.breed = blank(&fields.breed);
                pet.age = blank(&fields.age);
                pet.color = blank(&fields.color);
                pet.description = blank(&fields.description);
                pet.location = fields.location.trim().to_string();
                pet.image_url = blank(&fields.image_url);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_pet_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("update_pet_status")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        match state.pets.iter_mut().find(|p| p.id == id) {
            Some(pet) => {
                pet.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_pet(&self, id: Uuid) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("delete_pet")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        if state.applications.iter().any(|a| a.pet_id == id) {
            return Err(PawhavenError::Storage {
                source: "FOREIGN KEY constraint failed".into(),
            });
        }
        let before = state.pets.len();
        state.pets.retain(|p| p.id != id);
        Ok(before - state.pets.len())
    }

    async fn delete_pet_cascade(&self, id: Uuid) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("delete_pet_cascade")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        let before = state.pets.len();
        state.pets.retain(|p| p.id != id);
        let deleted = before - state.pets.len();
        if deleted > 0 {
            state.applications.retain(|a| a.pet_id != id);
        }
        Ok(deleted)
    }

    async fn insert_application(
        &self,
        application: &AdoptionApplication,
    ) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("insert_application")?;
        state.applications.push(application.clone());
        Ok(())
    }

    async fn get_application(
        &self,
        id: Uuid,
    ) -> Result<Option<AdoptionApplication>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("get_application")?;
        let found = state.applications.iter().find(|a| a.id == id).cloned();
        Ok(found.map(|a| state.join(a)))
    }

    async fn list_applications(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AdoptionApplication>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_applications")?;
        let rows = select(
            &state.applications,
            query,
            |a| a.status.to_string(),
            |a| a.created_at,
        );
        Ok(rows.into_iter().map(|a| state.join(a)).collect())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("update_application_status")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        match state.applications.iter_mut().find(|a| a.id == id) {
            Some(application) => {
                application.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_applications_for_pet(&self, pet_id: Uuid) -> Result<u64, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("count_applications_for_pet")?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.pet_id == pet_id)
            .count() as u64)
    }

    fn supports_transactions(&self) -> bool {
        self.transactions
    }

    async fn approve_application_atomic(
        &self,
        application_id: Uuid,
        pet_id: Uuid,
    ) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("approve_application_atomic")?;
        if !self.transactions {
            return Err(PawhavenError::Internal(
                "mock storage created without transaction support".to_string(),
            ));
        }
        let Some(app_idx) = state.applications.iter().position(|a| a.id == application_id)
        else {
            return Err(PawhavenError::ZeroRows {
                collection: Collection::AdoptionApplications,
                id: application_id,
            });
        };
        let Some(pet_idx) = state.pets.iter().position(|p| p.id == pet_id) else {
            return Err(PawhavenError::ZeroRows {
                collection: Collection::AdoptionPets,
                id: pet_id,
            });
        };
        state.applications[app_idx].status = ApplicationStatus::Approved;
        state.pets[pet_idx].status = ListingStatus::Unavailable;
        Ok(())
    }

    async fn record_compensation(&self, entry: &Compensation) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("record_compensation")?;
        state.compensations.push(entry.clone());
        Ok(())
    }

    async fn clear_compensation(&self, id: Uuid) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("clear_compensation")?;
        state.compensations.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_compensations(&self) -> Result<Vec<Compensation>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_compensations")?;
        let mut entries = state.compensations.clone();
        entries.sort_by_key(|c| c.created_at);
        Ok(entries)
    }

    async fn insert_message(&self, message: &ContactMessage) -> Result<(), PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("insert_message")?;
        state.messages.push(message.clone());
        Ok(())
    }

    async fn list_messages(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<ContactMessage>, PawhavenError> {
        let mut state = self.state.lock().await;
        state.enter("list_messages")?;
        Ok(select(&state.messages, query, message_status, |m| m.created_at))
    }

    async fn mark_message_read(&self, id: Uuid) -> Result<usize, PawhavenError> {
        let mut state = self.state.lock().await;
        if state.enter("mark_message_read")? == Some(Injected::ZeroRows) {
            return Ok(0);
        }
        match state.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.read = true;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn records_calls_in_order() {
        let storage = MockStorage::new();
        storage.list_pets(&ListQuery::all()).await.unwrap();
        storage.count(Collection::LostPets, None).await.unwrap();
        assert_eq!(storage.calls().await, vec!["list_pets", "count"]);
        assert_eq!(storage.call_count("count").await, 1);
    }

    #[tokio::test]
    async fn injected_failure_leaves_state_untouched() {
        let storage = MockStorage::new();
        let pet = fixtures::adoption_pet("Rex", fixtures::at_minute(0));
        storage.seed_pet(pet.clone()).await;
        storage.inject("update_pet_status", Injected::Fail).await;

        let result = storage
            .update_pet_status(pet.id, ListingStatus::Unavailable)
            .await;
        assert!(matches!(result, Err(PawhavenError::Storage { .. })));
        assert_eq!(
            storage.pet(pet.id).await.unwrap().status,
            ListingStatus::Available
        );
    }

    #[tokio::test]
    async fn injected_zero_rows_reports_no_match() {
        let storage = MockStorage::new();
        let pet = fixtures::adoption_pet("Rex", fixtures::at_minute(0));
        storage.seed_pet(pet.clone()).await;
        storage.inject("update_pet_status", Injected::ZeroRows).await;

        let rows = storage
            .update_pet_status(pet.id, ListingStatus::Unavailable)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_limits() {
        let storage = MockStorage::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            storage
                .seed_pet(fixtures::adoption_pet(name, fixtures::at_minute(i as i64)))
                .await;
        }
        let pets = storage.list_pets(&ListQuery::newest(2)).await.unwrap();
        let names: Vec<_> = pets.iter().map(|p| p.pet_name.as_str()).collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn applications_fall_back_to_unknown_pet() {
        let storage = MockStorage::new();
        let pet = fixtures::adoption_pet("Ghost", fixtures::at_minute(0));
        let application = fixtures::stored_application(&pet, fixtures::at_minute(1));
        storage.seed_application(application.clone()).await;

        let fetched = storage.application(application.id).await.unwrap();
        assert_eq!(fetched.pet_name, "Unknown");
        assert_eq!(fetched.pet_type, "Unknown");
    }
}
