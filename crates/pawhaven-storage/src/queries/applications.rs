// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption application operations.
//!
//! Reads join the referenced listing for its display fields, falling back to
//! `Unknown` when the listing is gone.

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{ApplicationStatus, Collection, ListQuery, ListingStatus};
use rusqlite::{Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{AdoptionApplication, RowExt, format_ts};

const SELECT_JOINED: &str = "SELECT a.id, a.pet_id, a.user_id, a.applicant_name, a.applicant_email,
            a.applicant_phone, a.reason, a.living_situation, a.experience, a.status,
            a.created_at, COALESCE(p.pet_name, 'Unknown'), COALESCE(p.pet_type, 'Unknown'),
            p.breed
     FROM adoption_applications a
     LEFT JOIN adoption_pets p ON p.id = a.pet_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<AdoptionApplication> {
    Ok(AdoptionApplication {
        id: row.get_uuid(0)?,
        pet_id: row.get_uuid(1)?,
        user_id: row.get_uuid(2)?,
        applicant_name: row.get(3)?,
        applicant_email: row.get(4)?,
        applicant_phone: row.get(5)?,
        reason: row.get(6)?,
        living_situation: row.get(7)?,
        experience: row.get(8)?,
        status: row.get_enum(9)?,
        created_at: row.get_ts(10)?,
        pet_name: row.get(11)?,
        pet_type: row.get(12)?,
        pet_breed: row.get(13)?,
    })
}

/// Outcome of the single-transaction approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicApproval {
    Applied,
    /// No application matched; nothing was written.
    ApplicationMissing,
    /// No listing matched; the application write was rolled back.
    PetMissing,
}

/// Insert an application. The joined display fields are ignored.
pub async fn insert(db: &Database, application: &AdoptionApplication) -> Result<(), PawhavenError> {
    let a = application.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO adoption_applications
                     (id, pet_id, user_id, applicant_name, applicant_email, applicant_phone,
                      reason, living_situation, experience, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    a.id.to_string(),
                    a.pet_id.to_string(),
                    a.user_id.to_string(),
                    a.applicant_name,
                    a.applicant_email,
                    a.applicant_phone,
                    a.reason,
                    a.living_situation,
                    a.experience,
                    a.status.to_string(),
                    format_ts(a.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: Uuid) -> Result<Option<AdoptionApplication>, PawhavenError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_JOINED} WHERE a.id = ?1"))?;
            match stmt.query_row(params![id.to_string()], from_row) {
                Ok(application) => Ok(Some(application)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list(
    db: &Database,
    query: &ListQuery,
) -> Result<Vec<AdoptionApplication>, PawhavenError> {
    let (sql, values) = super::list_sql(
        SELECT_JOINED,
        Collection::AdoptionApplications,
        Some("a"),
        query,
    )?;
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_status(
    db: &Database,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<usize, PawhavenError> {
    let rows = db
        .connection()
        .call(move |conn| {
            Ok(conn.execute(
                "UPDATE adoption_applications SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id.to_string()],
            )?)
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%id, %status, rows, "application status written");
    Ok(rows)
}

pub async fn count_for_pet(db: &Database, pet_id: Uuid) -> Result<u64, PawhavenError> {
    let count: i64 = db
        .connection()
        .call(move |conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM adoption_applications WHERE pet_id = ?1",
                params![pet_id.to_string()],
                |row| row.get(0),
            )?)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(count.max(0) as u64)
}

/// Approve the application and mark the listing unavailable in one transaction.
pub async fn approve_atomic(
    db: &Database,
    application_id: Uuid,
    pet_id: Uuid,
) -> Result<AtomicApproval, PawhavenError> {
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let applications = tx.execute(
                "UPDATE adoption_applications SET status = ?1 WHERE id = ?2",
                params![
                    ApplicationStatus::Approved.to_string(),
                    application_id.to_string()
                ],
            )?;
            if applications == 0 {
                tx.rollback()?;
                return Ok(AtomicApproval::ApplicationMissing);
            }
            let pets = tx.execute(
                "UPDATE adoption_pets SET status = ?1 WHERE id = ?2",
                params![ListingStatus::Unavailable.to_string(), pet_id.to_string()],
            )?;
            if pets == 0 {
                tx.rollback()?;
                return Ok(AtomicApproval::PetMissing);
            }
            tx.commit()?;
            Ok(AtomicApproval::Applied)
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%application_id, %pet_id, ?outcome, "atomic approval");
    Ok(outcome)
}
