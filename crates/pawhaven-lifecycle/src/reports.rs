// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lost and found report lifecycle.
//!
//! ```text
//! pending -> approved | rejected
//! approved -> reunited
//! ```
//!
//! The table is only enforced when `lifecycle.enforce_terminal_states` is on.
//! Otherwise an administrator may write any status, including moving a
//! `reunited` report back to `pending`. Writing any status other than
//! `reunited` clears the reunion story and date. `reunited` itself is only
//! written by [`ReportService::mark_reunited`], with or without enforcement.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pawhaven_core::types::{
    FoundPetReport, ListQuery, LostPetReport, NewFoundReport, NewLostReport, PetRecord,
    ReportStatusUpdate,
};
use pawhaven_core::{PawhavenError, ReportKind, ReportStatus, Session, StorageAdapter};

use crate::Caches;
use crate::cache::read_with_retry;
use crate::ensure_matched;
use crate::filter::ReportFilter;
use crate::validation::{FormCheck, optional};

/// Whether `from -> to` is in the report transition table.
pub fn is_allowed_transition(from: ReportStatus, to: ReportStatus) -> bool {
    use ReportStatus::*;
    from == to
        || matches!(
            (from, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Reunited)
        )
}

pub struct ReportService {
    storage: Arc<dyn StorageAdapter>,
    caches: Arc<Caches>,
    enforce_terminal_states: bool,
}

impl ReportService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        caches: Arc<Caches>,
        enforce_terminal_states: bool,
    ) -> Self {
        Self {
            storage,
            caches,
            enforce_terminal_states,
        }
    }

    /// Files a lost-pet report owned by the session user, in `pending`.
    pub async fn submit_lost_report(
        &self,
        session: &Session,
        input: NewLostReport,
    ) -> Result<LostPetReport, PawhavenError> {
        let user_id = session.require_user()?;

        let mut check = FormCheck::new();
        let pet_name = check.required("pet_name", &input.pet_name);
        let pet_type = check.required("pet_type", &input.pet_type);
        let last_seen_location = check.required("last_seen_location", &input.last_seen_location);
        let last_seen_date = check.date("last_seen_date", &input.last_seen_date);
        let contact_name = check.required("contact_name", &input.contact_name);
        let contact_email = check.optional_email("contact_email", &input.contact_email);
        check.finish()?;

        let report = LostPetReport {
            id: Uuid::new_v4(),
            pet_name: Some(pet_name),
            pet_type,
            breed: optional(&input.breed),
            color: optional(&input.color),
            description: optional(&input.description),
            last_seen_location,
            last_seen_date,
            contact_name,
            contact_phone: optional(&input.contact_phone),
            contact_email,
            image_url: optional(&input.image_url),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            reunite_story: None,
            reunite_date: None,
            user_id,
        };
        self.storage.insert_lost_report(&report).await?;
        self.caches.lost.invalidate().await;

        tracing::info!(report_id = %report.id, %user_id, "lost pet report submitted");
        Ok(report)
    }

    /// Files a found-pet report owned by the session user, in `pending`.
    pub async fn submit_found_report(
        &self,
        session: &Session,
        input: NewFoundReport,
    ) -> Result<FoundPetReport, PawhavenError> {
        let user_id = session.require_user()?;

        let mut check = FormCheck::new();
        let pet_type = check.required("pet_type", &input.pet_type);
        let found_location = check.required("found_location", &input.found_location);
        let found_date = check.date("found_date", &input.found_date);
        let contact_name = check.required("contact_name", &input.contact_name);
        let contact_email = check.optional_email("contact_email", &input.contact_email);
        check.finish()?;

        let report = FoundPetReport {
            id: Uuid::new_v4(),
            pet_type,
            breed: optional(&input.breed),
            color: optional(&input.color),
            description: optional(&input.description),
            found_location,
            found_date,
            contact_name,
            contact_phone: optional(&input.contact_phone),
            contact_email,
            image_url: optional(&input.image_url),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            reunite_story: None,
            reunite_date: None,
            user_id,
        };
        self.storage.insert_found_report(&report).await?;
        self.caches.found.invalidate().await;

        tracing::info!(report_id = %report.id, %user_id, "found pet report submitted");
        Ok(report)
    }

    /// Administrator status write. `reunited` is rejected here; use
    /// [`Self::mark_reunited`], which records the story and date.
    pub async fn set_report_status(
        &self,
        session: &Session,
        kind: ReportKind,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;
        if status == ReportStatus::Reunited {
            return Err(PawhavenError::Validation(
                "reunited is set through the reunite operation".to_string(),
            ));
        }
        if self.enforce_terminal_states {
            self.check_transition(kind, id, status).await?;
        }

        let rows = self
            .storage
            .update_report_status(kind, id, &ReportStatusUpdate::status(status))
            .await?;
        ensure_matched(rows, kind.collection(), id)?;
        self.invalidate(kind).await;

        tracing::info!(%kind, report_id = %id, %status, "report status changed");
        Ok(())
    }

    /// Marks a report reunited with `story` (stored as given), dated now.
    pub async fn mark_reunited(
        &self,
        session: &Session,
        kind: ReportKind,
        id: Uuid,
        story: &str,
    ) -> Result<(), PawhavenError> {
        session.require_admin()?;
        if self.enforce_terminal_states {
            self.check_transition(kind, id, ReportStatus::Reunited).await?;
        }

        let update = ReportStatusUpdate::reunited(story.to_string(), Utc::now());
        let rows = self.storage.update_report_status(kind, id, &update).await?;
        ensure_matched(rows, kind.collection(), id)?;
        self.invalidate(kind).await;

        tracing::info!(%kind, report_id = %id, "report marked reunited");
        Ok(())
    }

    async fn check_transition(
        &self,
        kind: ReportKind,
        id: Uuid,
        to: ReportStatus,
    ) -> Result<(), PawhavenError> {
        let from = self.current_status(kind, id).await?;
        // Reunited -> reunited rewrites the story, so it is not a no-op here.
        let allowed = if to == ReportStatus::Reunited {
            from == ReportStatus::Approved
        } else {
            is_allowed_transition(from, to)
        };
        if !allowed {
            return Err(PawhavenError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    async fn current_status(
        &self,
        kind: ReportKind,
        id: Uuid,
    ) -> Result<ReportStatus, PawhavenError> {
        let status = match kind {
            ReportKind::Lost => self.fetch_lost(id).await?.map(|r| r.status),
            ReportKind::Found => self.fetch_found(id).await?.map(|r| r.status),
        };
        status.ok_or(PawhavenError::NotFound {
            collection: kind.collection(),
            id,
        })
    }

    async fn fetch_lost(&self, id: Uuid) -> Result<Option<LostPetReport>, PawhavenError> {
        read_with_retry("lost_pets:get", || self.storage.get_lost_report(id)).await
    }

    async fn fetch_found(&self, id: Uuid) -> Result<Option<FoundPetReport>, PawhavenError> {
        read_with_retry("found_pets:get", || self.storage.get_found_report(id)).await
    }

    async fn invalidate(&self, kind: ReportKind) {
        match kind {
            ReportKind::Lost => self.caches.lost.invalidate().await,
            ReportKind::Found => self.caches.found.invalidate().await,
        }
    }

    async fn lost_with_status(&self, status: ReportStatus) -> Result<Vec<LostPetReport>, PawhavenError> {
        let query = ListQuery::with_status(status);
        self.caches
            .lost
            .get_or_fetch(&status.to_string(), || self.storage.list_lost_reports(&query))
            .await
    }

    async fn found_with_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<FoundPetReport>, PawhavenError> {
        let query = ListQuery::with_status(status);
        self.caches
            .found
            .get_or_fetch(&status.to_string(), || self.storage.list_found_reports(&query))
            .await
    }

    /// Approved reports, newest first, narrowed by `filter`.
    pub async fn list_public_reports(
        &self,
        kind: ReportKind,
        filter: &ReportFilter,
    ) -> Result<Vec<PetRecord>, PawhavenError> {
        Ok(match kind {
            ReportKind::Lost => filter
                .apply(self.lost_with_status(ReportStatus::Approved).await?)
                .into_iter()
                .map(PetRecord::Lost)
                .collect(),
            ReportKind::Found => filter
                .apply(self.found_with_status(ReportStatus::Approved).await?)
                .into_iter()
                .map(PetRecord::Found)
                .collect(),
        })
    }

    /// A single approved report; anything else is `NotFound`.
    pub async fn public_report(
        &self,
        kind: ReportKind,
        id: Uuid,
    ) -> Result<PetRecord, PawhavenError> {
        let record = match kind {
            ReportKind::Lost => self
                .fetch_lost(id)
                .await?
                .filter(|r| r.status == ReportStatus::Approved)
                .map(PetRecord::Lost),
            ReportKind::Found => self
                .fetch_found(id)
                .await?
                .filter(|r| r.status == ReportStatus::Approved)
                .map(PetRecord::Found),
        };
        record.ok_or(PawhavenError::NotFound {
            collection: kind.collection(),
            id,
        })
    }

    /// Reunited lost and found reports, most recent reunion first.
    pub async fn list_reunited(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<PetRecord>, PawhavenError> {
        let lost = filter.apply(self.lost_with_status(ReportStatus::Reunited).await?);
        let found = filter.apply(self.found_with_status(ReportStatus::Reunited).await?);

        let mut records: Vec<(chrono::DateTime<Utc>, PetRecord)> = lost
            .into_iter()
            .map(|r| (r.reunite_date.unwrap_or(r.created_at), PetRecord::Lost(r)))
            .chain(
                found
                    .into_iter()
                    .map(|r| (r.reunite_date.unwrap_or(r.created_at), PetRecord::Found(r))),
            )
            .collect();
        records.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(records.into_iter().map(|(_, record)| record).collect())
    }

    /// Every report of `kind`, any status, newest first. Administrator only.
    pub async fn list_all_reports(
        &self,
        session: &Session,
        kind: ReportKind,
        filter: &ReportFilter,
    ) -> Result<Vec<PetRecord>, PawhavenError> {
        session.require_admin()?;
        let all = ListQuery::all();
        Ok(match kind {
            ReportKind::Lost => {
                let reports = self
                    .caches
                    .lost
                    .get_or_fetch("all", || self.storage.list_lost_reports(&all))
                    .await?;
                filter.apply(reports).into_iter().map(PetRecord::Lost).collect()
            }
            ReportKind::Found => {
                let reports = self
                    .caches
                    .found
                    .get_or_fetch("all", || self.storage.list_found_reports(&all))
                    .await?;
                filter.apply(reports).into_iter().map(PetRecord::Found).collect()
            }
        })
    }
}
