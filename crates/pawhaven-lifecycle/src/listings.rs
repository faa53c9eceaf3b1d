// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption listing CRUD and the manual availability toggle.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pawhaven_config::model::PetDeletePolicy;
use pawhaven_core::types::{AdoptionPet, ListQuery, PetFields};
use pawhaven_core::{Collection, ListingStatus, PawhavenError, Session, StorageAdapter};

use crate::Caches;
use crate::cache::read_with_retry;
use crate::ensure_matched;
use crate::filter::ListingFilter;
use crate::validation::{FormCheck, optional};

fn check_fields(fields: &PetFields) -> Result<(), PawhavenError> {
    let mut check = FormCheck::new();
    check.required("pet_name", &fields.pet_name);
    check.required("pet_type", &fields.pet_type);
    check.required("age", &fields.age);
    check.required("location", &fields.location);
    check.finish()
}

pub struct ListingService {
    storage: Arc<dyn StorageAdapter>,
    caches: Arc<Caches>,
    delete_policy: PetDeletePolicy,
}

impl ListingService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        caches: Arc<Caches>,
        delete_policy: PetDeletePolicy,
    ) -> Self {
        Self {
            storage,
            caches,
            delete_policy,
        }
    }

    pub async fn add_pet(
        &self,
        session: &Session,
        fields: PetFields,
    ) -> Result<AdoptionPet, PawhavenError> {
        session.require_admin()?;
        check_fields(&fields)?;

        let pet = AdoptionPet {
            id: Uuid::new_v4(),
            pet_name: fields.pet_name.trim().to_string(),
            pet_type: fields.pet_type.trim().to_string(),
            breed: optional(&fields.breed),
            age: optional(&fields.age),
            color: optional(&fields.color),
            description: optional(&fields.description),
            location: fields.location.trim().to_string(),
            image_url: optional(&fields.image_url),
            status: ListingStatus::Available,
            created_at: Utc::now(),
        };
        self.storage.insert_pet(&pet).await?;
        self.caches.pets.invalidate().await;

        tracing::info!(pet_id = %pet.id, pet_name = %pet.pet_name, "adoption listing added");
        Ok(pet)
    }

    /// Overwrites every mutable field; the listing status is left alone.
    pub async fn edit_pet(
        &self,
        session: &Session,
        id: Uuid,
        fields: PetFields,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;
        check_fields(&fields)?;

        let rows = self.storage.update_pet_fields(id, &fields).await?;
        ensure_matched(rows, Collection::AdoptionPets, id)?;
        self.caches.pets.invalidate().await;
        // Applications show the listing's name and breed.
        self.caches.applications.invalidate().await;

        tracing::info!(pet_id = %id, "adoption listing edited");
        Ok(())
    }

    /// Manual toggle. No check for approved applications.
    pub async fn set_listing_status(
        &self,
        session: &Session,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;

        let rows = self.storage.update_pet_status(id, status).await?;
        ensure_matched(rows, Collection::AdoptionPets, id)?;
        self.caches.pets.invalidate().await;

        tracing::info!(pet_id = %id, %status, "adoption listing status changed");
        Ok(())
    }

    /// Hard delete, subject to the configured policy for referencing applications.
    pub async fn delete_pet(&self, session: &Session, id: Uuid) -> Result<(), PawhavenError> {
        session.require_admin()?;

        let rows = match self.delete_policy {
            PetDeletePolicy::Reject => {
                let applications = self.storage.count_applications_for_pet(id).await?;
                if applications > 0 {
                    return Err(PawhavenError::Conflict(format!(
                        "pet {id} is referenced by {applications} adoption application(s)"
                    )));
                }
                self.storage.delete_pet(id).await?
            }
            PetDeletePolicy::Cascade => self.storage.delete_pet_cascade(id).await?,
        };
        ensure_matched(rows, Collection::AdoptionPets, id)?;
        self.caches.pets.invalidate().await;
        self.caches.applications.invalidate().await;

        tracing::info!(pet_id = %id, policy = ?self.delete_policy, "adoption listing deleted");
        Ok(())
    }

    async fn available(&self) -> Result<Vec<AdoptionPet>, PawhavenError> {
        let query = ListQuery::with_status(ListingStatus::Available);
        self.caches
            .pets
            .get_or_fetch("available", || self.storage.list_pets(&query))
            .await
    }

    /// Public listing of available pets, newest first.
    pub async fn list_available_pets(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<AdoptionPet>, PawhavenError> {
        Ok(filter.apply(self.available().await?))
    }

    /// A single available listing; unavailable or missing is `NotFound`.
    pub async fn available_pet(&self, id: Uuid) -> Result<AdoptionPet, PawhavenError> {
        read_with_retry("adoption_pets:get", || self.storage.get_pet(id))
            .await?
            .filter(|pet| pet.status == ListingStatus::Available)
            .ok_or(PawhavenError::NotFound {
                collection: Collection::AdoptionPets,
                id,
            })
    }

    pub async fn list_all_pets(
        &self,
        session: &Session,
        filter: &ListingFilter,
    ) -> Result<Vec<AdoptionPet>, PawhavenError> {
        session.require_admin()?;
        let all = ListQuery::all();
        let pets = self
            .caches
            .pets
            .get_or_fetch("all", || self.storage.list_pets(&all))
            .await?;
        Ok(filter.apply(pets))
    }
}
