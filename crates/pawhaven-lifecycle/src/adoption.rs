// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption applications and the approval coupling.
//!
//! Approving an application must also take its pet off the market. With
//! `approval_mode = "atomic"` and a transactional store, both writes happen in
//! one transaction. Otherwise approval runs in two steps:
//!
//! 1. write the application `approved`; any failure aborts before the pet is touched;
//! 2. write the pet `unavailable`; a failure here leaves the application approved
//!    and the pet available, reported as [`PawhavenError::PetUpdate`].
//!
//! The two-step path is bracketed by a compensation record written before
//! step 1 and cleared after step 2, so the [`Reconciler`](crate::Reconciler)
//! can repair anything left half done.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pawhaven_config::model::ApprovalMode;
use pawhaven_core::types::{AdoptionApplication, Compensation, ListQuery, NewApplication};
use pawhaven_core::{
    ApplicationStatus, Collection, ListingStatus, PawhavenError, Session, StorageAdapter,
    parse_record_id,
};

use crate::Caches;
use crate::cache::read_with_retry;
use crate::ensure_matched;
use crate::filter::PetFilter;
use crate::validation::FormCheck;

pub struct AdoptionService {
    storage: Arc<dyn StorageAdapter>,
    caches: Arc<Caches>,
    approval_mode: ApprovalMode,
    enforce_terminal_states: bool,
}

impl AdoptionService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        caches: Arc<Caches>,
        approval_mode: ApprovalMode,
        enforce_terminal_states: bool,
    ) -> Self {
        Self {
            storage,
            caches,
            approval_mode,
            enforce_terminal_states,
        }
    }

    /// Applies for an available listing on behalf of the session user.
    pub async fn submit_application(
        &self,
        session: &Session,
        pet_id: Uuid,
        input: NewApplication,
    ) -> Result<AdoptionApplication, PawhavenError> {
        let user_id = session.require_user()?;

        let mut check = FormCheck::new();
        let applicant_name = check.required("applicant_name", &input.applicant_name);
        let applicant_email = check.email("applicant_email", &input.applicant_email);
        let applicant_phone = check.required("applicant_phone", &input.applicant_phone);
        let reason = check.required("reason", &input.reason);
        let living_situation = check.required("living_situation", &input.living_situation);
        let experience = check.required("experience", &input.experience);
        check.finish()?;

        let pet = read_with_retry("adoption_pets:get", || self.storage.get_pet(pet_id))
            .await?
            .ok_or(PawhavenError::NotFound {
                collection: Collection::AdoptionPets,
                id: pet_id,
            })?;
        if pet.status != ListingStatus::Available {
            return Err(PawhavenError::Validation(format!(
                "pet {pet_id} is not available for adoption"
            )));
        }

        let application = AdoptionApplication {
            id: Uuid::new_v4(),
            pet_id,
            user_id,
            applicant_name,
            applicant_email,
            applicant_phone: Some(applicant_phone),
            reason: Some(reason),
            living_situation: Some(living_situation),
            experience: Some(experience),
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
            pet_name: pet.pet_name,
            pet_type: pet.pet_type,
            pet_breed: pet.breed,
        };
        self.storage.insert_application(&application).await?;
        self.caches.applications.invalidate().await;

        tracing::info!(application_id = %application.id, %pet_id, %user_id, "adoption application submitted");
        Ok(application)
    }

    /// Approves an application and marks its pet unavailable.
    ///
    /// Both ids are format-checked before any store call.
    pub async fn approve_application(
        &self,
        session: &Session,
        application_id: &str,
        pet_id: &str,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;
        let application_id = parse_record_id("application", application_id)?;
        let pet_id = parse_record_id("pet", pet_id)?;

        if self.enforce_terminal_states {
            self.check_pending(application_id, ApplicationStatus::Approved)
                .await?;
        }

        let result = if self.approval_mode == ApprovalMode::Atomic
            && self.storage.supports_transactions()
        {
            self.approve_atomic(application_id, pet_id).await
        } else {
            self.approve_two_step(application_id, pet_id).await
        };

        if !matches!(result, Err(PawhavenError::ApplicationUpdate { .. })) {
            self.caches.applications.invalidate().await;
            self.caches.pets.invalidate().await;
        }
        if result.is_ok() {
            tracing::info!(%application_id, %pet_id, "adoption application approved");
        }
        result
    }

    async fn approve_atomic(
        &self,
        application_id: Uuid,
        pet_id: Uuid,
    ) -> Result<(), PawhavenError> {
        // Nothing was applied if the transaction failed.
        self.storage
            .approve_application_atomic(application_id, pet_id)
            .await
            .map_err(|source| PawhavenError::ApplicationUpdate {
                application_id,
                source: Box::new(source),
            })
    }

    async fn approve_two_step(
        &self,
        application_id: Uuid,
        pet_id: Uuid,
    ) -> Result<(), PawhavenError> {
        let compensation = Compensation {
            id: Uuid::new_v4(),
            application_id,
            pet_id,
            created_at: Utc::now(),
        };
        self.storage.record_compensation(&compensation).await?;

        let step_one = self
            .storage
            .update_application_status(application_id, ApplicationStatus::Approved)
            .await
            .and_then(|rows| ensure_matched(rows, Collection::AdoptionApplications, application_id));
        if let Err(source) = step_one {
            self.clear_compensation(compensation.id).await;
            return Err(PawhavenError::ApplicationUpdate {
                application_id,
                source: Box::new(source),
            });
        }

        let step_two = self
            .storage
            .update_pet_status(pet_id, ListingStatus::Unavailable)
            .await
            .and_then(|rows| ensure_matched(rows, Collection::AdoptionPets, pet_id));
        if let Err(source) = step_two {
            tracing::error!(
                %application_id,
                %pet_id,
                compensation_id = %compensation.id,
                error = %source,
                "application approved but pet is still available"
            );
            return Err(PawhavenError::PetUpdate {
                application_id,
                pet_id,
                source: Box::new(source),
            });
        }

        self.clear_compensation(compensation.id).await;
        Ok(())
    }

    async fn clear_compensation(&self, id: Uuid) {
        if let Err(e) = self.storage.clear_compensation(id).await {
            // The reconciler clears it on its next pass.
            tracing::warn!(compensation_id = %id, error = %e, "failed to clear compensation record");
        }
    }

    /// Single-step rejection; the pet is not touched.
    pub async fn reject_application(
        &self,
        session: &Session,
        application_id: Uuid,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;
        if self.enforce_terminal_states {
            self.check_pending(application_id, ApplicationStatus::Rejected)
                .await?;
        }

        let rows = self
            .storage
            .update_application_status(application_id, ApplicationStatus::Rejected)
            .await?;
        ensure_matched(rows, Collection::AdoptionApplications, application_id)?;
        self.caches.applications.invalidate().await;

        tracing::info!(%application_id, "adoption application rejected");
        Ok(())
    }

    async fn check_pending(
        &self,
        application_id: Uuid,
        to: ApplicationStatus,
    ) -> Result<(), PawhavenError> {
        let application = read_with_retry("adoption_applications:get", || {
            self.storage.get_application(application_id)
        })
        .await?
        .ok_or(PawhavenError::NotFound {
            collection: Collection::AdoptionApplications,
            id: application_id,
        })?;
        if application.status.is_terminal() && application.status != to {
            return Err(PawhavenError::InvalidTransition {
                from: application.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Every application, newest first, searched by applicant or pet name.
    pub async fn list_applications(
        &self,
        session: &Session,
        filter: &PetFilter,
    ) -> Result<Vec<AdoptionApplication>, PawhavenError> {
        session.require_admin()?;
        let all = ListQuery::all();
        let applications = self
            .caches
            .applications
            .get_or_fetch("all", || self.storage.list_applications(&all))
            .await?;
        Ok(filter.apply(applications))
    }
}
