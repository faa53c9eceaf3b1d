// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Found-pet report operations.

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{Collection, ListQuery};
use rusqlite::{Row, params, params_from_iter};
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{FoundPetReport, RowExt, format_date, format_ts};

const COLUMNS: &str = "id, pet_type, breed, color, description, found_location, found_date,
     contact_name, contact_phone, contact_email, image_url, status, created_at,
     reunite_story, reunite_date, user_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<FoundPetReport> {
    Ok(FoundPetReport {
        id: row.get_uuid(0)?,
        pet_type: row.get(1)?,
        breed: row.get(2)?,
        color: row.get(3)?,
        description: row.get(4)?,
        found_location: row.get(5)?,
        found_date: row.get_date(6)?,
        contact_name: row.get(7)?,
        contact_phone: row.get(8)?,
        contact_email: row.get(9)?,
        image_url: row.get(10)?,
        status: row.get_enum(11)?,
        created_at: row.get_ts(12)?,
        reunite_story: row.get(13)?,
        reunite_date: row.get_opt_ts(14)?,
        user_id: row.get_uuid(15)?,
    })
}

pub async fn insert(db: &Database, report: &FoundPetReport) -> Result<(), PawhavenError> {
    let r = report.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO found_pets ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                params![
                    r.id.to_string(),
                    r.pet_type,
                    r.breed,
                    r.color,
                    r.description,
                    r.found_location,
                    format_date(r.found_date),
                    r.contact_name,
                    r.contact_phone,
                    r.contact_email,
                    r.image_url,
                    r.status.to_string(),
                    format_ts(r.created_at),
                    r.reunite_story,
                    r.reunite_date.map(format_ts),
                    r.user_id.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: Uuid) -> Result<Option<FoundPetReport>, PawhavenError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM found_pets WHERE id = ?1"))?;
            match stmt.query_row(params![id.to_string()], from_row) {
                Ok(report) => Ok(Some(report)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list(db: &Database, query: &ListQuery) -> Result<Vec<FoundPetReport>, PawhavenError> {
    let (sql, values) = super::list_sql(
        &format!("SELECT {COLUMNS} FROM found_pets"),
        Collection::FoundPets,
        None,
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use pawhaven_core::types::ReportStatus;
    use tempfile::tempdir;

    #[tokio::test]
    async fn found_report_without_optional_fields_roundtrips() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("found.db").to_str().unwrap())
            .await
            .unwrap();

        let report = FoundPetReport {
            id: Uuid::new_v4(),
            pet_type: "Cat".to_string(),
            breed: None,
            color: None,
            description: None,
            found_location: "Elm Street".to_string(),
            found_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            contact_name: "Sam".to_string(),
            contact_phone: None,
            contact_email: None,
            image_url: None,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            reunite_story: None,
            reunite_date: None,
            user_id: Uuid::new_v4(),
        };
        insert(&db, &report).await.unwrap();

        let fetched = get(&db, report.id).await.unwrap().unwrap();
        assert_eq!(fetched.found_location, "Elm Street");
        assert!(fetched.breed.is_none());
        assert_eq!(fetched.status, ReportStatus::Pending);

        let pending = list(&db, &ListQuery::with_status("pending")).await.unwrap();
        assert_eq!(pending.len(), 1);
        let approved = list(&db, &ListQuery::with_status("approved")).await.unwrap();
        assert!(approved.is_empty());
        db.close().await.unwrap();
    }
}
